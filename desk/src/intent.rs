//! Consequential actions that go through the confirmation dialog.

use crate::confirmation::{confirmation_store, ConfirmationEnvironment, ConfirmationRequest, ConfirmationStore};
use crate::environment::DeskEnvironment;
use crate::error::Result;
use crate::registration::RegistrationEnvironment;
use eventdesk_core::types::{EventId, ReviewDecision, RoleId, UserId};

/// An action the user has to confirm before it runs
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeskIntent {
    /// Leave one event
    Unregister(EventId),
    /// Leave every selected event
    UnregisterMany(Vec<EventId>),
    /// Approve or reject a submission
    ReviewEvent {
        /// Submission under review
        event_id: EventId,
        /// Decision taken
        decision: ReviewDecision,
    },
    /// Lock or unlock an account
    SetAccountLocked {
        /// Account
        user_id: UserId,
        /// New lock state
        locked: bool,
    },
    /// Change a user's role
    AssignRole {
        /// Account
        user_id: UserId,
        /// New role
        role_id: RoleId,
    },
}

impl DeskIntent {
    /// The dialog shown before running this intent
    #[must_use]
    pub fn confirmation(self) -> ConfirmationRequest<Self> {
        let (title, message, confirm) = match &self {
            Self::Unregister(_) => (
                "Unregister".to_string(),
                "Do you want to unregister from this event?".to_string(),
                "Unregister",
            ),
            Self::UnregisterMany(ids) => (
                "Unregister".to_string(),
                format!("Do you want to unregister from {} events?", ids.len()),
                "Unregister",
            ),
            Self::ReviewEvent { decision: ReviewDecision::Approve, .. } => (
                "Approve event".to_string(),
                "The event will be published.".to_string(),
                "Approve",
            ),
            Self::ReviewEvent { decision: ReviewDecision::Reject { .. }, .. } => (
                "Reject event".to_string(),
                "The submitter will see your reason.".to_string(),
                "Reject",
            ),
            Self::SetAccountLocked { user_id, locked: true } => (
                "Lock account".to_string(),
                format!("{user_id} will no longer be able to sign in."),
                "Lock",
            ),
            Self::SetAccountLocked { user_id, locked: false } => (
                "Unlock account".to_string(),
                format!("{user_id} will be able to sign in again."),
                "Unlock",
            ),
            Self::AssignRole { user_id, role_id } => (
                "Change role".to_string(),
                format!("Give {user_id} the role {role_id}?"),
                "Change",
            ),
        };
        ConfirmationRequest::new(title, message, self).with_confirm_label(confirm)
    }
}

/// Runs confirmed intents against the backend
#[derive(Clone)]
pub struct DeskPerformer {
    registration: RegistrationEnvironment,
    desk: DeskEnvironment,
}

impl DeskPerformer {
    /// Performer sharing the registration flows' backend and ledger
    #[must_use]
    pub fn new(registration: RegistrationEnvironment) -> Self {
        let desk = DeskEnvironment::new(
            registration.api.clone(),
            registration.notifier.clone(),
        );
        Self { registration, desk }
    }

    /// Run `intent`
    ///
    /// # Errors
    ///
    /// Whatever the underlying flow returns. Every flow has already notified
    /// the user by the time this returns.
    pub async fn perform(&self, intent: DeskIntent) -> Result<()> {
        match intent {
            DeskIntent::Unregister(event_id) => self.registration.unregister(&event_id).await,
            DeskIntent::UnregisterMany(event_ids) => {
                let user_id = self.registration.current_user().await;
                self.registration
                    .unregister_many(user_id.as_ref(), event_ids)
                    .await
                    .map(|_| ())
            },
            DeskIntent::ReviewEvent { event_id, decision } => {
                self.desk.review_event(&event_id, decision).await
            },
            DeskIntent::SetAccountLocked { user_id, locked } => {
                self.desk.set_account_locked(&user_id, locked).await
            },
            DeskIntent::AssignRole { user_id, role_id } => {
                self.desk.assign_role(&user_id, &role_id).await
            },
        }
    }

    /// Confirmation store whose confirmed intents run on this performer
    #[must_use]
    pub fn into_store(self) -> ConfirmationStore<DeskIntent> {
        confirmation_store(ConfirmationEnvironment::new(move |intent| {
            let performer = self.clone();
            async move {
                if let Err(error) = performer.perform(intent).await {
                    tracing::debug!(error = %error, "Confirmed action failed");
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_dialog_counts_the_selection() {
        let request = DeskIntent::UnregisterMany(vec!["e1".into(), "e2".into()]).confirmation();
        assert_eq!(request.message, "Do you want to unregister from 2 events?");
        assert_eq!(request.confirm_label, "Unregister");
        assert_eq!(request.cancel_label, "Cancel");
    }

    #[test]
    fn lock_dialog_names_the_account() {
        let request =
            DeskIntent::SetAccountLocked { user_id: "u7".into(), locked: true }.confirmation();
        assert_eq!(request.title, "Lock account");
        assert!(request.message.starts_with("u7 "));
    }
}
