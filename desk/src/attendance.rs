//! Attendance sheet of one event.
//!
//! Every flag change is sent to the backend before the local copy is touched.
//! In editing mode changes collect in a draft and are saved together, one
//! request per changed attendee.

use crate::attendees::{filter_and_sort, AttendeeQuery, StatusSource};
use crate::environment::DeskEnvironment;
use crate::error::Result;
use eventdesk_core::error::ValidationError;
use eventdesk_core::types::{Attendee, EventId, UserId};
use futures::future::join_all;
use std::collections::HashMap;

/// Result of saving a draft
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Attendees whose flag was stored
    pub saved: Vec<UserId>,
    /// Attendees whose flag was refused, with the reason
    pub failed: Vec<(UserId, String)>,
}

/// The loaded attendees of one event
pub struct AttendanceBook {
    env: DeskEnvironment,
    event_id: EventId,
    attendees: Vec<Attendee>,
    draft: Option<HashMap<UserId, bool>>,
}

impl AttendanceBook {
    /// Fetch the attendees of `event_id`
    ///
    /// # Errors
    ///
    /// Returns the API error when the list cannot be fetched.
    pub async fn load(env: DeskEnvironment, event_id: EventId) -> Result<Self> {
        match env.api.fetch_attendees(event_id.clone()).await {
            Ok(attendees) => {
                tracing::debug!(event_id = %event_id, count = attendees.len(), "Attendees loaded");
                Ok(Self { env, event_id, attendees, draft: None })
            },
            Err(error) => {
                tracing::warn!(event_id = %event_id, error = %error, "Loading attendees failed");
                env.notifier
                    .error(&error.reason_or(|| "Could not load attendees".to_string()));
                Err(error.into())
            },
        }
    }

    /// Event the sheet belongs to
    #[must_use]
    pub const fn event_id(&self) -> &EventId {
        &self.event_id
    }

    /// Attendees with their persisted flags, in backend order
    #[must_use]
    pub fn attendees(&self) -> &[Attendee] {
        &self.attendees
    }

    /// Persisted flag of `user_id`
    #[must_use]
    pub fn is_attending(&self, user_id: &UserId) -> Option<bool> {
        self.find(user_id).map(|attendee| attendee.is_attending)
    }

    fn find(&self, user_id: &UserId) -> Option<&Attendee> {
        self.attendees.iter().find(|attendee| &attendee.user_id == user_id)
    }

    fn apply(&mut self, user_id: &UserId, attending: bool) {
        if let Some(attendee) = self.attendees.iter_mut().find(|a| &a.user_id == user_id) {
            attendee.is_attending = attending;
        }
    }

    /// Flip the persisted flag of `user_id`
    ///
    /// The local flag changes only once the backend has accepted the new
    /// value. Returns the new flag.
    ///
    /// # Errors
    ///
    /// [`ValidationError::UnknownAttendee`] when `user_id` is not on the
    /// sheet; the API error when the backend refuses.
    pub async fn toggle(&mut self, user_id: &UserId) -> Result<bool> {
        let Some(current) = self.is_attending(user_id) else {
            return Err(ValidationError::UnknownAttendee(user_id.clone()).into());
        };
        let attending = !current;

        match self
            .env
            .api
            .set_attendance(self.event_id.clone(), user_id.clone(), attending)
            .await
        {
            Ok(()) => {
                self.apply(user_id, attending);
                metrics::counter!("eventdesk.attendance.saved", "outcome" => "success").increment(1);
                tracing::info!(event_id = %self.event_id, user_id = %user_id, attending, "Attendance updated");
                Ok(attending)
            },
            Err(error) => {
                metrics::counter!("eventdesk.attendance.saved", "outcome" => "failure").increment(1);
                tracing::warn!(event_id = %self.event_id, user_id = %user_id, error = %error, "Attendance update failed");
                self.env.notifier.error(
                    &error.reason_or(|| format!("Could not update attendance of {user_id}")),
                );
                Err(error.into())
            },
        }
    }

    /// Whether the sheet is in editing mode
    #[must_use]
    pub const fn is_editing(&self) -> bool {
        self.draft.is_some()
    }

    /// Enter editing mode with a draft copied from the persisted flags
    ///
    /// Calling it again while editing keeps the current draft.
    pub fn begin_editing(&mut self) {
        if self.draft.is_none() {
            self.draft = Some(
                self.attendees
                    .iter()
                    .map(|attendee| (attendee.user_id.clone(), attendee.is_attending))
                    .collect(),
            );
        }
    }

    /// Draft flag of `user_id`, when editing
    #[must_use]
    pub fn draft_flag(&self, user_id: &UserId) -> Option<bool> {
        self.draft.as_ref()?.get(user_id).copied()
    }

    /// Change a draft flag locally
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotEditing`] outside editing mode,
    /// [`ValidationError::UnknownAttendee`] when `user_id` is not on the sheet.
    pub fn set_draft(
        &mut self,
        user_id: &UserId,
        attending: bool,
    ) -> std::result::Result<(), ValidationError> {
        let draft = self.draft.as_mut().ok_or(ValidationError::NotEditing)?;
        match draft.get_mut(user_id) {
            Some(flag) => {
                *flag = attending;
                Ok(())
            },
            None => Err(ValidationError::UnknownAttendee(user_id.clone())),
        }
    }

    /// Leave editing mode without saving
    pub fn discard_draft(&mut self) {
        self.draft = None;
    }

    /// Persist every draft flag that differs from the stored one
    ///
    /// Requests run concurrently and settle independently. Only accepted flags
    /// are applied locally. Editing mode ends when every request succeeded;
    /// otherwise the draft is kept so the failed flags can be saved again.
    ///
    /// # Errors
    ///
    /// [`ValidationError::NotEditing`] outside editing mode. Per-attendee
    /// failures are reported in [`SaveOutcome::failed`].
    pub async fn save_draft(&mut self) -> Result<SaveOutcome> {
        let Some(draft) = self.draft.as_ref() else {
            return Err(ValidationError::NotEditing.into());
        };

        let changes: Vec<(UserId, bool)> = self
            .attendees
            .iter()
            .filter_map(|attendee| {
                let flag = draft.get(&attendee.user_id).copied()?;
                (flag != attendee.is_attending).then(|| (attendee.user_id.clone(), flag))
            })
            .collect();

        let api = &self.env.api;
        let event_id = &self.event_id;
        let results = join_all(changes.into_iter().map(|(user_id, attending)| async move {
            let result = api.set_attendance(event_id.clone(), user_id.clone(), attending).await;
            (user_id, attending, result)
        }))
        .await;

        let mut outcome = SaveOutcome::default();
        for (user_id, attending, result) in results {
            match result {
                Ok(()) => {
                    self.apply(&user_id, attending);
                    outcome.saved.push(user_id);
                },
                Err(error) => {
                    tracing::warn!(event_id = %self.event_id, user_id = %user_id, error = %error, "Saving attendance failed");
                    let reason =
                        error.reason_or(|| format!("Could not update attendance of {user_id}"));
                    outcome.failed.push((user_id, reason));
                },
            }
        }

        if outcome.failed.is_empty() {
            self.draft = None;
        }

        self.report(&outcome);
        Ok(outcome)
    }

    fn report(&self, outcome: &SaveOutcome) {
        let saved = outcome.saved.len();
        let failed = outcome.failed.len();

        metrics::counter!("eventdesk.attendance.saved", "outcome" => "success")
            .increment(saved as u64);
        metrics::counter!("eventdesk.attendance.saved", "outcome" => "failure")
            .increment(failed as u64);
        tracing::info!(event_id = %self.event_id, saved, failed, "Attendance draft saved");

        if saved > 0 {
            self.env.notifier.success(&format!("Saved attendance for {saved} attendees"));
        }
        if failed > 0 {
            self.env
                .notifier
                .error(&format!("Failed to save attendance for {failed} attendees"));
        }
    }

    /// Attendees filtered and ordered by `query`
    ///
    /// Status ordering reads the draft flags in editing mode and the persisted
    /// flags otherwise.
    #[must_use]
    pub fn view(&self, query: &AttendeeQuery) -> Vec<&Attendee> {
        let source = self
            .draft
            .as_ref()
            .map_or(StatusSource::Persisted, StatusSource::Draft);
        filter_and_sort(&self.attendees, query, source)
    }
}
