//! Registration ledger for the signed-in user.
//!
//! The ledger is built once from the fetched event list and then kept in sync
//! by discrete mark operations issued after each confirmed (or optimistic)
//! mutation. It is an explicit context object: flows receive a
//! [`LedgerHandle`] instead of reaching for shared globals, so each test can
//! build an isolated instance.

use eventdesk_core::types::{Event, EventId, UserId};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// What the user can see and do for one event
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegistrationStatus {
    /// The user submitted the event; no register/unregister action is offered
    Created,
    /// The user is registered
    Registered,
    /// The user is not registered
    NotRegistered,
}

/// Direction of a membership change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Change {
    /// Becoming registered
    Register,
    /// Leaving the event
    Unregister,
}

/// Lifecycle of an optimistic change
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpdateState {
    /// Applied locally, backend has not answered yet
    Pending,
    /// Backend accepted the change
    Confirmed,
    /// Backend refused the change and the previous state was restored
    RolledBack,
}

#[derive(Clone, Copy, Debug)]
struct Tracked {
    change: Change,
    was_registered: bool,
    state: UpdateState,
}

/// Per-user registration state keyed by event id
///
/// `created` and `registered` are maintained independently; eligibility
/// checks treat `created` as taking precedence.
#[derive(Clone, Debug, Default)]
pub struct RegistrationLedger {
    user_id: Option<UserId>,
    registered: HashSet<EventId>,
    created: HashSet<EventId>,
    tracked: HashMap<EventId, Tracked>,
}

impl RegistrationLedger {
    /// Empty ledger for `user_id`
    #[must_use]
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    /// Derive the ledger from a fetched event list
    #[must_use]
    pub fn from_events(user_id: impl Into<UserId>, events: &[Event]) -> Self {
        let mut ledger = Self::new(user_id);
        ledger.sync(events);
        ledger
    }

    /// Replace registration and creation sets with what `events` says
    ///
    /// Outstanding change tracking is cleared: a fresh fetch is authoritative.
    pub fn sync(&mut self, events: &[Event]) {
        self.registered.clear();
        self.created.clear();
        self.tracked.clear();

        let Some(user_id) = self.user_id.clone() else {
            return;
        };

        for event in events {
            if event.is_created_by(&user_id) {
                self.created.insert(event.id.clone());
            }
            if event.has_registered(&user_id) {
                self.registered.insert(event.id.clone());
            }
        }
    }

    /// The user the ledger belongs to
    #[must_use]
    pub const fn user_id(&self) -> Option<&UserId> {
        self.user_id.as_ref()
    }

    /// Status used to decide which action to show for `event_id`
    #[must_use]
    pub fn status(&self, event_id: &EventId) -> RegistrationStatus {
        if self.created.contains(event_id) {
            RegistrationStatus::Created
        } else if self.registered.contains(event_id) {
            RegistrationStatus::Registered
        } else {
            RegistrationStatus::NotRegistered
        }
    }

    /// Whether the user is registered to `event_id`, ignoring creation
    #[must_use]
    pub fn is_registered(&self, event_id: &EventId) -> bool {
        self.registered.contains(event_id)
    }

    /// Whether the user created `event_id`
    #[must_use]
    pub fn is_created(&self, event_id: &EventId) -> bool {
        self.created.contains(event_id)
    }

    /// Whether a register action may be offered
    #[must_use]
    pub fn can_register(&self, event_id: &EventId) -> bool {
        self.status(event_id) == RegistrationStatus::NotRegistered && !self.is_pending(event_id)
    }

    /// Whether an unregister action may be offered
    #[must_use]
    pub fn can_unregister(&self, event_id: &EventId) -> bool {
        self.status(event_id) == RegistrationStatus::Registered && !self.is_pending(event_id)
    }

    /// Record a confirmed registration
    pub fn mark_registered(&mut self, event_id: &EventId) {
        self.registered.insert(event_id.clone());
    }

    /// Record a confirmed unregistration
    pub fn mark_unregistered(&mut self, event_id: &EventId) {
        self.registered.remove(event_id);
    }

    /// Record that the user created `event_id`
    pub fn mark_created(&mut self, event_id: &EventId) {
        self.created.insert(event_id.clone());
    }

    /// Ids the user is registered to, in no particular order
    pub fn registered_ids(&self) -> impl Iterator<Item = &EventId> {
        self.registered.iter()
    }

    /// Apply `change` optimistically and start tracking it as [`UpdateState::Pending`]
    pub fn begin(&mut self, event_id: &EventId, change: Change) {
        let was_registered = self.registered.contains(event_id);
        match change {
            Change::Register => self.mark_registered(event_id),
            Change::Unregister => self.mark_unregistered(event_id),
        }
        self.tracked.insert(
            event_id.clone(),
            Tracked { change, was_registered, state: UpdateState::Pending },
        );
    }

    /// The backend accepted the pending change for `event_id`
    pub fn confirm(&mut self, event_id: &EventId) {
        if let Some(tracked) = self.tracked.get_mut(event_id) {
            if tracked.state == UpdateState::Pending {
                tracked.state = UpdateState::Confirmed;
            }
        }
    }

    /// The backend refused the pending change; restore the previous membership
    pub fn roll_back(&mut self, event_id: &EventId) {
        let Some(tracked) = self.tracked.get_mut(event_id) else {
            return;
        };
        if tracked.state != UpdateState::Pending {
            return;
        }
        tracked.state = UpdateState::RolledBack;
        if tracked.was_registered {
            self.registered.insert(event_id.clone());
        } else {
            self.registered.remove(event_id);
        }
    }

    /// State of the last optimistic change for `event_id`
    #[must_use]
    pub fn update_state(&self, event_id: &EventId) -> Option<UpdateState> {
        self.tracked.get(event_id).map(|tracked| tracked.state)
    }

    /// Direction of the last optimistic change for `event_id`
    #[must_use]
    pub fn last_change(&self, event_id: &EventId) -> Option<Change> {
        self.tracked.get(event_id).map(|tracked| tracked.change)
    }

    /// Whether a change for `event_id` has not settled yet
    #[must_use]
    pub fn is_pending(&self, event_id: &EventId) -> bool {
        self.update_state(event_id) == Some(UpdateState::Pending)
    }
}

/// Shared, cloneable handle to a [`RegistrationLedger`]
#[derive(Clone, Debug, Default)]
pub struct LedgerHandle(Arc<RwLock<RegistrationLedger>>);

impl LedgerHandle {
    /// Wrap a ledger
    #[must_use]
    pub fn new(ledger: RegistrationLedger) -> Self {
        Self(Arc::new(RwLock::new(ledger)))
    }

    /// Read through a projection
    pub async fn read<T>(&self, f: impl FnOnce(&RegistrationLedger) -> T) -> T {
        let ledger = self.0.read().await;
        f(&ledger)
    }

    /// Mutate in place
    pub async fn update<T>(&self, f: impl FnOnce(&mut RegistrationLedger) -> T) -> T {
        let mut ledger = self.0.write().await;
        f(&mut ledger)
    }

    /// Current status for `event_id`
    pub async fn status(&self, event_id: &EventId) -> RegistrationStatus {
        self.read(|ledger| ledger.status(event_id)).await
    }

    /// Record a confirmed unregistration
    pub async fn mark_unregistered(&self, event_id: &EventId) {
        self.update(|ledger| ledger.mark_unregistered(event_id)).await;
    }

    /// Record a confirmed registration
    pub async fn mark_registered(&self, event_id: &EventId) {
        self.update(|ledger| ledger.mark_registered(event_id)).await;
    }
}
