//! Confirmation dialog state machine.
//!
//! `Idle -> Pending -> Idle`. A consequential action is requested as a
//! [`ConfirmationRequest`] carrying the intent to run. Confirming clears the
//! pending request and hands the intent to the environment's performer as an
//! effect, so the intent only starts once the dialog state is already idle.
//! Cancelling clears the request without running anything.

use eventdesk_core::effect::Effect;
use eventdesk_core::reducer::Reducer;
use eventdesk_core::{smallvec, SmallVec};
use eventdesk_runtime::Store;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

/// A question put to the user before running `intent`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationRequest<K> {
    /// Dialog title
    pub title: String,
    /// Dialog body
    pub message: String,
    /// Label of the confirming button
    pub confirm_label: String,
    /// Label of the cancelling button
    pub cancel_label: String,
    /// What runs when the user confirms
    pub intent: K,
}

impl<K> ConfirmationRequest<K> {
    /// Request with default button labels
    #[must_use]
    pub fn new(title: impl Into<String>, message: impl Into<String>, intent: K) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            confirm_label: "Confirm".to_string(),
            cancel_label: "Cancel".to_string(),
            intent,
        }
    }

    /// Override the confirming button label
    #[must_use]
    pub fn with_confirm_label(mut self, label: impl Into<String>) -> Self {
        self.confirm_label = label.into();
        self
    }

    /// Override the cancelling button label
    #[must_use]
    pub fn with_cancel_label(mut self, label: impl Into<String>) -> Self {
        self.cancel_label = label.into();
        self
    }
}

/// At most one outstanding request
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConfirmationState<K> {
    pending: Option<ConfirmationRequest<K>>,
}

impl<K> Default for ConfirmationState<K> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<K> ConfirmationState<K> {
    /// The request to render, if any
    #[must_use]
    pub const fn pending(&self) -> Option<&ConfirmationRequest<K>> {
        self.pending.as_ref()
    }

    /// Whether no request is outstanding
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.pending.is_none()
    }
}

/// Inputs of the confirmation dialog
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfirmationAction<K> {
    /// Ask the user; ignored while another request is pending
    Request(ConfirmationRequest<K>),
    /// The user accepted
    Confirm,
    /// The user declined or dismissed the dialog
    Cancel,
}

/// Runs a confirmed intent
pub type Performer<K> = Arc<dyn Fn(K) -> Pin<Box<dyn Future<Output = ()> + Send>> + Send + Sync>;

/// Dependencies of the confirmation reducer
pub struct ConfirmationEnvironment<K> {
    performer: Performer<K>,
}

impl<K> Clone for ConfirmationEnvironment<K> {
    fn clone(&self) -> Self {
        Self { performer: Arc::clone(&self.performer) }
    }
}

impl<K> fmt::Debug for ConfirmationEnvironment<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfirmationEnvironment").finish_non_exhaustive()
    }
}

impl<K> ConfirmationEnvironment<K> {
    /// Environment running confirmed intents with `perform`
    pub fn new<F, Fut>(perform: F) -> Self
    where
        F: Fn(K) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self { performer: Arc::new(move |intent| Box::pin(perform(intent))) }
    }
}

/// Reducer of the confirmation dialog
pub struct ConfirmationReducer<K> {
    _intent: PhantomData<fn() -> K>,
}

impl<K> ConfirmationReducer<K> {
    /// Create a new confirmation reducer
    #[must_use]
    pub const fn new() -> Self {
        Self { _intent: PhantomData }
    }
}

impl<K> Default for ConfirmationReducer<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> Reducer for ConfirmationReducer<K>
where
    K: fmt::Debug + Send + 'static,
{
    type State = ConfirmationState<K>;
    type Action = ConfirmationAction<K>;
    type Environment = ConfirmationEnvironment<K>;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> SmallVec<[Effect<Self::Action>; 4]> {
        match action {
            ConfirmationAction::Request(request) => {
                if let Some(current) = &state.pending {
                    tracing::warn!(
                        pending = %current.title,
                        ignored = %request.title,
                        "Confirmation already pending, ignoring request"
                    );
                } else {
                    tracing::debug!(title = %request.title, "Confirmation requested");
                    state.pending = Some(request);
                }
                smallvec![Effect::None]
            },

            ConfirmationAction::Confirm => match state.pending.take() {
                Some(request) => {
                    tracing::debug!(intent = ?request.intent, "Confirmed");
                    smallvec![Effect::fire_and_forget((env.performer)(request.intent))]
                },
                None => smallvec![Effect::None],
            },

            ConfirmationAction::Cancel => {
                if let Some(request) = state.pending.take() {
                    tracing::debug!(title = %request.title, "Confirmation cancelled");
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// Store driving a confirmation dialog
pub type ConfirmationStore<K> =
    Store<ConfirmationState<K>, ConfirmationAction<K>, ConfirmationEnvironment<K>, ConfirmationReducer<K>>;

/// Build an idle confirmation store
#[must_use]
pub fn confirmation_store<K>(env: ConfirmationEnvironment<K>) -> ConfirmationStore<K>
where
    K: fmt::Debug + Send + Sync + 'static,
{
    Store::new(ConfirmationState::default(), ConfirmationReducer::new(), env)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use eventdesk_testing::{assertions, ReducerTest};

    fn request(title: &str) -> ConfirmationRequest<&'static str> {
        ConfirmationRequest::new(title, "Are you sure?", "intent")
    }

    fn env() -> ConfirmationEnvironment<&'static str> {
        ConfirmationEnvironment::new(|_| async {})
    }

    #[test]
    fn request_moves_to_pending() {
        ReducerTest::new(ConfirmationReducer::new())
            .with_env(env())
            .given_state(ConfirmationState::default())
            .when_action(ConfirmationAction::Request(request("Unregister")))
            .then_state(|state| {
                assert_eq!(state.pending().map(|r| r.title.as_str()), Some("Unregister"));
            })
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn second_request_is_ignored() {
        ReducerTest::new(ConfirmationReducer::new())
            .with_env(env())
            .given_state(ConfirmationState::default())
            .when_action(ConfirmationAction::Request(request("Lock account")))
            .when_action(ConfirmationAction::Request(request("Change role")))
            .then_state(|state| {
                assert_eq!(state.pending().map(|r| r.title.as_str()), Some("Lock account"));
            })
            .run();
    }

    #[test]
    fn confirm_clears_and_schedules_the_intent() {
        ReducerTest::new(ConfirmationReducer::new())
            .with_env(env())
            .given_state(ConfirmationState::default())
            .when_action(ConfirmationAction::Request(request("Unregister")))
            .when_action(ConfirmationAction::Confirm)
            .then_state(|state| assert!(state.is_idle()))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_future_effect(effects);
            })
            .run();
    }

    #[test]
    fn cancel_clears_without_effects() {
        ReducerTest::new(ConfirmationReducer::new())
            .with_env(env())
            .given_state(ConfirmationState::default())
            .when_action(ConfirmationAction::Request(request("Unregister")))
            .when_action(ConfirmationAction::Cancel)
            .then_state(|state| assert!(state.is_idle()))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }

    #[test]
    fn confirm_while_idle_does_nothing() {
        ReducerTest::new(ConfirmationReducer::new())
            .with_env(env())
            .given_state(ConfirmationState::default())
            .when_action(ConfirmationAction::Confirm)
            .then_state(|state| assert!(state.is_idle()))
            .then_effects(|effects| assertions::assert_no_effects(effects))
            .run();
    }
}
