//! Registering to and leaving events, one event at a time.
//!
//! Single changes are optimistic: the ledger is updated first and tracked as
//! pending, then confirmed or rolled back once the backend answers. The ledger
//! outlives the view, so it is settled even after the view closed; only the
//! notifications are dropped then.

use crate::error::Result;
use crate::ledger::{Change, LedgerHandle, RegistrationLedger};
use crate::scope::ViewScope;
use eventdesk_core::environment::{EventsApi, Notifier};
use eventdesk_core::error::ValidationError;
use eventdesk_core::types::{Event, EventId, UserId};
use std::sync::Arc;

/// Environment dependencies for registration flows
#[derive(Clone)]
pub struct RegistrationEnvironment {
    /// Backend
    pub api: Arc<dyn EventsApi>,
    /// Toast sink
    pub notifier: Arc<dyn Notifier>,
    /// Registration state of the signed-in user
    pub ledger: LedgerHandle,
    /// Liveness of the view driving the flows
    pub scope: ViewScope,
}

impl RegistrationEnvironment {
    /// Creates a new `RegistrationEnvironment` with an open scope
    #[must_use]
    pub fn new(api: Arc<dyn EventsApi>, notifier: Arc<dyn Notifier>, ledger: LedgerHandle) -> Self {
        Self { api, notifier, ledger, scope: ViewScope::new() }
    }

    /// Attach the flows to an existing view scope
    #[must_use]
    pub fn with_scope(mut self, scope: ViewScope) -> Self {
        self.scope = scope;
        self
    }

    /// The signed-in user, if the ledger has one
    pub async fn current_user(&self) -> Option<UserId> {
        self.ledger.read(|ledger| ledger.user_id().cloned()).await
    }

    /// Fetch approved events and rebuild the ledger from them
    ///
    /// # Errors
    ///
    /// Returns the API error if the list cannot be fetched; the ledger is left
    /// untouched in that case.
    pub async fn load_events(&self) -> Result<Vec<Event>> {
        match self.api.fetch_approved_events().await {
            Ok(events) => {
                self.ledger.update(|ledger| ledger.sync(&events)).await;
                tracing::debug!(count = events.len(), "Approved events loaded");
                Ok(events)
            },
            Err(error) => {
                tracing::warn!(error = %error, "Loading approved events failed");
                self.notifier.error(&error.reason_or(|| "Could not load events".to_string()));
                Err(error.into())
            },
        }
    }

    /// Register the signed-in user to `event_id`
    ///
    /// # Errors
    ///
    /// Validation errors when the user created the event, is already
    /// registered, or another change is in flight; API errors otherwise.
    pub async fn register(&self, event_id: &EventId) -> Result<()> {
        self.apply(event_id, Change::Register).await
    }

    /// Remove the signed-in user from `event_id`
    ///
    /// # Errors
    ///
    /// Validation errors when the user created the event, is not registered,
    /// or another change is in flight; API errors otherwise.
    pub async fn unregister(&self, event_id: &EventId) -> Result<()> {
        self.apply(event_id, Change::Unregister).await
    }

    async fn apply(&self, event_id: &EventId, change: Change) -> Result<()> {
        let begun = self
            .ledger
            .update(|ledger| begin_change(ledger, event_id, change))
            .await;

        let user_id = match begun {
            Ok(user_id) => user_id,
            Err(error) => {
                self.notifier.error(&error.to_string());
                return Err(error.into());
            },
        };

        let result = match change {
            Change::Register => self.api.register_for_event(event_id.clone(), user_id).await,
            Change::Unregister => self.api.unregister_from_event(event_id.clone(), user_id).await,
        };

        let open = self.scope.is_open();

        match result {
            Ok(()) => {
                self.ledger.update(|ledger| ledger.confirm(event_id)).await;
                tracing::info!(event_id = %event_id, ?change, "Registration change confirmed");
                if open {
                    self.notifier.success(match change {
                        Change::Register => "Registered for event",
                        Change::Unregister => "Unregistered from event",
                    });
                }
                Ok(())
            },
            Err(error) => {
                self.ledger.update(|ledger| ledger.roll_back(event_id)).await;
                tracing::warn!(event_id = %event_id, ?change, error = %error, "Registration change rolled back");
                if open {
                    let verb = match change {
                        Change::Register => "Register",
                        Change::Unregister => "Unregister",
                    };
                    self.notifier
                        .error(&error.reason_or(|| format!("{verb} failed for event {event_id}")));
                }
                Err(error.into())
            },
        }
    }
}

fn begin_change(
    ledger: &mut RegistrationLedger,
    event_id: &EventId,
    change: Change,
) -> std::result::Result<UserId, ValidationError> {
    let user_id = ledger.user_id().cloned().ok_or(ValidationError::MissingUser)?;

    if ledger.is_created(event_id) {
        return Err(ValidationError::CreatedBySelf);
    }
    if ledger.is_pending(event_id) {
        return Err(ValidationError::ChangePending);
    }
    match (change, ledger.is_registered(event_id)) {
        (Change::Register, true) => return Err(ValidationError::AlreadyRegistered),
        (Change::Unregister, false) => return Err(ValidationError::NotRegistered),
        _ => {},
    }

    ledger.begin(event_id, change);
    Ok(user_id)
}
