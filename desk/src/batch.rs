//! Batch unregistration.
//!
//! One request per selected event is dispatched at once. Every request settles
//! on its own: a failing id never cancels or delays its siblings, and failed
//! ids are left registered for the user to retry. There are no automatic
//! retries.

use crate::error::Result;
use crate::registration::RegistrationEnvironment;
use eventdesk_core::error::ValidationError;
use eventdesk_core::types::{EventId, UserId};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::HashSet;
use std::sync::Arc;

/// An id whose unregistration failed, with the reason shown to the user
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedUnregistration {
    /// Event that is still registered
    pub event_id: EventId,
    /// Server message, transport error, or a generic fallback
    pub reason: String,
}

/// Aggregate result of a batch, in settlement order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Ids that were unregistered
    pub succeeded: Vec<EventId>,
    /// Ids that stayed registered
    pub failed: Vec<FailedUnregistration>,
    /// Ids never sent: created by the user, not registered, or with a single
    /// change still in flight
    pub skipped: Vec<EventId>,
}

impl BatchOutcome {
    /// Number of successful requests
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    /// Number of failed requests
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// Ids of the failed requests
    #[must_use]
    pub fn failed_ids(&self) -> Vec<EventId> {
        self.failed.iter().map(|f| f.event_id.clone()).collect()
    }
}

impl RegistrationEnvironment {
    /// Unregister `user_id` from every event in `event_ids`
    ///
    /// Duplicate ids are collapsed and ids the ledger does not allow to
    /// unregister from are skipped. The ledger is updated once per successful
    /// id after the whole batch has settled, in settlement order, followed by
    /// at most one success and one failure notification.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptySelection`] or
    /// [`ValidationError::MissingUser`] without issuing any request. Per-id
    /// failures are not errors; they are reported in [`BatchOutcome::failed`].
    #[tracing::instrument(skip_all, name = "unregister_many")]
    pub async fn unregister_many(
        &self,
        user_id: Option<&UserId>,
        event_ids: impl IntoIterator<Item = EventId>,
    ) -> Result<BatchOutcome> {
        let selection = dedupe(event_ids);
        let user_id = match validate(user_id, &selection) {
            Ok(user_id) => user_id.clone(),
            Err(error) => {
                self.notifier.error(&error.to_string());
                return Err(error.into());
            },
        };

        let (selection, skipped) = self
            .ledger
            .read(|ledger| selection.into_iter().partition::<Vec<_>, _>(|id| ledger.can_unregister(id)))
            .await;
        if !skipped.is_empty() {
            tracing::debug!(skipped = skipped.len(), "Skipping events that cannot be unregistered");
        }

        tracing::debug!(user_id = %user_id, selected = selection.len(), "Dispatching unregistrations");

        let mut in_flight: FuturesUnordered<_> = selection
            .into_iter()
            .map(|event_id| {
                let api = Arc::clone(&self.api);
                let user_id = user_id.clone();
                async move {
                    let result = api.unregister_from_event(event_id.clone(), user_id).await;
                    (event_id, result)
                }
            })
            .collect();

        let mut outcome = BatchOutcome { skipped, ..BatchOutcome::default() };
        while let Some((event_id, result)) = in_flight.next().await {
            match result {
                Ok(()) => outcome.succeeded.push(event_id),
                Err(error) => {
                    let reason =
                        error.reason_or(|| format!("Unregister failed for event {event_id}"));
                    tracing::warn!(event_id = %event_id, error = %error, "Unregistration failed");
                    outcome.failed.push(FailedUnregistration { event_id, reason });
                },
            }
        }

        if !self.scope.is_open() {
            tracing::debug!("View closed, ignoring batch results");
            return Ok(outcome);
        }

        for event_id in &outcome.succeeded {
            self.ledger.mark_unregistered(event_id).await;
        }

        report(self, &outcome);
        Ok(outcome)
    }
}

fn dedupe(event_ids: impl IntoIterator<Item = EventId>) -> Vec<EventId> {
    let mut seen = HashSet::new();
    event_ids
        .into_iter()
        .filter(|event_id| seen.insert(event_id.clone()))
        .collect()
}

fn validate<'a>(
    user_id: Option<&'a UserId>,
    selection: &[EventId],
) -> std::result::Result<&'a UserId, ValidationError> {
    if selection.is_empty() {
        return Err(ValidationError::EmptySelection);
    }
    user_id
        .filter(|user_id| !user_id.is_blank())
        .ok_or(ValidationError::MissingUser)
}

fn report(env: &RegistrationEnvironment, outcome: &BatchOutcome) {
    let succeeded = outcome.success_count();
    let failed = outcome.failure_count();

    metrics::counter!("eventdesk.unregister.outcome", "outcome" => "success")
        .increment(succeeded as u64);
    metrics::counter!("eventdesk.unregister.outcome", "outcome" => "failure")
        .increment(failed as u64);
    tracing::info!(succeeded, failed, "Batch unregistration settled");

    if succeeded > 0 {
        env.notifier.success(&format!("Unregistered {succeeded} events"));
    }
    if failed > 0 {
        env.notifier.error(&format!("Failed to unregister {failed} events"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicates_are_collapsed_in_order() {
        let ids = dedupe(["b", "a", "b", "c", "a"].map(EventId::new));
        assert_eq!(ids, ["b", "a", "c"].map(EventId::new).to_vec());
    }

    #[test]
    fn empty_selection_wins_over_missing_user() {
        assert_eq!(validate(None, &[]), Err(ValidationError::EmptySelection));
    }

    #[test]
    fn blank_user_counts_as_missing() {
        let blank = UserId::new(" ");
        assert_eq!(
            validate(Some(&blank), &[EventId::new("e1")]),
            Err(ValidationError::MissingUser)
        );
    }
}
