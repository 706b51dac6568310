//! Administrator actions: reviewing submissions and managing accounts.

use crate::environment::DeskEnvironment;
use crate::error::Result;
use eventdesk_core::error::{ApiError, ValidationError};
use eventdesk_core::types::{EventId, ReviewDecision, RoleId, UserId};

impl DeskEnvironment {
    /// Approve or reject a pending event submission
    ///
    /// # Errors
    ///
    /// [`ValidationError::MissingRejectionReason`] for a rejection with a
    /// blank reason; the API error when the backend refuses.
    pub async fn review_event(&self, event_id: &EventId, decision: ReviewDecision) -> Result<()> {
        if let ReviewDecision::Reject { reason } = &decision {
            if reason.trim().is_empty() {
                let error = ValidationError::MissingRejectionReason;
                self.notifier.error(&error.to_string());
                return Err(error.into());
            }
        }

        let done = match decision {
            ReviewDecision::Approve => "Event approved",
            ReviewDecision::Reject { .. } => "Event rejected",
        };
        let result = self.api.review_event(event_id.clone(), decision).await;
        self.settle(result, done, || format!("Could not review event {event_id}"))
    }

    /// Lock or unlock an account
    ///
    /// # Errors
    ///
    /// Returns the API error when the backend refuses.
    pub async fn set_account_locked(&self, user_id: &UserId, locked: bool) -> Result<()> {
        let result = self.api.set_account_locked(user_id.clone(), locked).await;
        let done = if locked { "Account locked" } else { "Account unlocked" };
        self.settle(result, done, || format!("Could not change the lock of {user_id}"))
    }

    /// Give `user_id` the role `role_id`
    ///
    /// # Errors
    ///
    /// Returns the API error when the backend refuses.
    pub async fn assign_role(&self, user_id: &UserId, role_id: &RoleId) -> Result<()> {
        let result = self.api.assign_role(user_id.clone(), role_id.clone()).await;
        self.settle(result, "Role updated", || format!("Could not change the role of {user_id}"))
    }

    fn settle(
        &self,
        result: std::result::Result<(), ApiError>,
        done: &str,
        fallback: impl FnOnce() -> String,
    ) -> Result<()> {
        match result {
            Ok(()) => {
                tracing::info!(outcome = done, "Administrative action applied");
                self.notifier.success(done);
                Ok(())
            },
            Err(error) => {
                tracing::warn!(error = %error, "Administrative action failed");
                self.notifier.error(&error.reason_or(fallback));
                Err(error.into())
            },
        }
    }
}
