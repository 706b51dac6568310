//! # eventdesk Runtime
//!
//! Store runtime that coordinates reducer execution and effect handling.
//!
//! ## Core Components
//!
//! - **Store**: Owns the state, runs the reducer, executes effects
//! - **`EffectHandle`**: Lets callers wait for the effects of one `send`
//!
//! The reducer always runs under the state write lock and returns effect
//! descriptions. The lock is released before any effect starts, so effects
//! observe the already-updated state and can never hold it hostage.
//!
//! ## Example
//!
//! ```ignore
//! use eventdesk_runtime::Store;
//!
//! let store = Store::new(ConfirmationState::default(), ConfirmationReducer::new(), env);
//!
//! store.send(ConfirmationAction::Confirm).await.wait().await;
//! let idle = store.state(|s| s.is_idle()).await;
//! ```

use eventdesk_core::{effect::Effect, reducer::Reducer};
use futures::future::{join_all, BoxFuture};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Tracks the effects spawned by a single [`Store::send`] call
///
/// Dropping the handle does not cancel anything; effects keep running
/// on their tasks.
#[derive(Debug, Default)]
pub struct EffectHandle {
    tasks: Vec<JoinHandle<()>>,
}

impl EffectHandle {
    /// A handle with nothing to wait for
    #[must_use]
    pub const fn completed() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Number of effect tasks spawned by the `send`
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the `send` spawned no effect tasks
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Wait for all effects (and the actions they fed back) to finish
    ///
    /// A panicking effect is logged and does not stop the others.
    pub async fn wait(self) {
        for result in join_all(self.tasks).await {
            if let Err(error) = result {
                tracing::error!(error = %error, "Effect task failed");
                metrics::counter!("store.effects.failed").increment(1);
            }
        }
    }
}

struct Inner<S, E, R> {
    state: RwLock<S>,
    reducer: R,
    environment: E,
}

/// The Store - runtime for a reducer
///
/// # Type Parameters
///
/// - `S`: State type
/// - `A`: Action type
/// - `E`: Environment type
/// - `R`: Reducer implementation
pub struct Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    inner: Arc<Inner<S, E, R>>,
}

impl<S, A, E, R> Clone for Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E>,
{
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

impl<S, A, E, R> Store<S, A, E, R>
where
    R: Reducer<State = S, Action = A, Environment = E> + Send + Sync + 'static,
    A: Send + 'static,
    S: Send + Sync + 'static,
    E: Send + Sync + 'static,
{
    /// Create a new store with initial state, reducer, and environment
    #[must_use]
    pub fn new(initial_state: S, reducer: R, environment: E) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new(initial_state),
                reducer,
                environment,
            }),
        }
    }

    /// Send an action to the store
    ///
    /// Runs the reducer under the state lock, releases the lock, then spawns
    /// one task per effect. Actions produced by effects are sent back to the
    /// store on the same task, so waiting on the returned handle also waits for
    /// the whole feedback chain.
    pub fn send(&self, action: A) -> BoxFuture<'static, EffectHandle> {
        let store = self.clone();
        Box::pin(async move {
            let effects = {
                let mut state = store.inner.state.write().await;
                store.inner.reducer.reduce(&mut state, action, &store.inner.environment)
            };

            let tasks = effects
                .into_iter()
                .filter(|effect| !effect.is_none())
                .map(|effect| tokio::spawn(store.clone().run_effect(effect)))
                .collect();

            EffectHandle { tasks }
        })
    }

    /// Read the current state through a projection
    pub async fn state<F, T>(&self, f: F) -> T
    where
        F: FnOnce(&S) -> T,
    {
        let state = self.inner.state.read().await;
        f(&state)
    }

    /// The injected environment
    #[must_use]
    pub fn environment(&self) -> &E {
        &self.inner.environment
    }

    fn run_effect(self, effect: Effect<A>) -> BoxFuture<'static, ()> {
        Box::pin(async move {
            match effect {
                Effect::None => {
                    tracing::trace!("Executing Effect::None (no-op)");
                },
                Effect::Future(fut) => {
                    tracing::trace!("Executing Effect::Future");
                    metrics::counter!("store.effects.executed", "type" => "future").increment(1);
                    if let Some(action) = fut.await {
                        tracing::trace!("Effect::Future produced an action, sending to store");
                        self.send(action).await.wait().await;
                    }
                },
            }
        })
    }
}
