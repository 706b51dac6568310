//! Submitting an edited event.

use crate::environment::DeskEnvironment;
use crate::error::Result;
use crate::membership::{reconcile, MembershipRow, Reconciled};
use eventdesk_core::error::ValidationError;
use eventdesk_core::types::{Event, EventId, EventUpdate, Membership, MembershipKind, UserId};
use eventdesk_core::{DateTime, Utc};

/// Contents of an event edit form
#[derive(Clone, Debug, Default)]
pub struct EventEdit {
    /// Event being edited
    pub event_id: EventId,
    /// Edited detail fields; membership lists are filled in on submit
    pub details: EventUpdate,
    /// Organizers already stored for the event
    pub existing_organizers: Vec<Membership>,
    /// Organizer rows entered in the form
    pub organizer_rows: Vec<MembershipRow>,
    /// Participants already stored for the event
    pub existing_participants: Vec<Membership>,
    /// Participant rows entered in the form
    pub participant_rows: Vec<MembershipRow>,
}

impl EventEdit {
    /// Empty edit of `event_id`
    #[must_use]
    pub fn new(event_id: impl Into<EventId>) -> Self {
        Self { event_id: event_id.into(), ..Self::default() }
    }

    /// Set the title
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.details.title = Some(title.into());
        self
    }

    /// Set the schedule
    #[must_use]
    pub fn with_schedule(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.details.start_time = Some(start);
        self.details.end_time = Some(end);
        self
    }

    /// Stored memberships of both kinds
    #[must_use]
    pub fn with_existing(mut self, organizers: Vec<Membership>, participants: Vec<Membership>) -> Self {
        self.existing_organizers = organizers;
        self.existing_participants = participants;
        self
    }

    /// Add an organizer row
    #[must_use]
    pub fn add_organizer(mut self, row: MembershipRow) -> Self {
        self.organizer_rows.push(row);
        self
    }

    /// Add a participant row
    #[must_use]
    pub fn add_participant(mut self, row: MembershipRow) -> Self {
        self.participant_rows.push(row);
        self
    }
}

/// Both membership lists of an edit after reconciliation
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedUpdate {
    details: EventUpdate,
    organizers: Reconciled,
    participants: Reconciled,
}

impl PreparedUpdate {
    /// Users entered more than once, tagged with their list
    #[must_use]
    pub fn duplicates(&self) -> Vec<(MembershipKind, UserId)> {
        tag(MembershipKind::Organizer, &self.organizers)
            .chain(tag(MembershipKind::Participant, &self.participants))
            .collect()
    }

    /// Payload with the reconciled membership lists
    ///
    /// # Errors
    ///
    /// [`ValidationError::NoOrganizers`] or [`ValidationError::NoParticipants`]
    /// when a reconciled list is empty, organizers checked first.
    pub fn into_payload(self) -> std::result::Result<EventUpdate, ValidationError> {
        if self.organizers.is_empty() {
            return Err(ValidationError::NoOrganizers);
        }
        if self.participants.is_empty() {
            return Err(ValidationError::NoParticipants);
        }

        let mut payload = self.details;
        payload.organizers = self.organizers.members;
        payload.participants = self.participants.members;
        Ok(payload)
    }
}

/// Reconcile both membership lists of `edit`
#[must_use]
pub fn prepare_update(edit: &EventEdit) -> PreparedUpdate {
    PreparedUpdate {
        details: edit.details.clone(),
        organizers: reconcile(&edit.existing_organizers, &edit.organizer_rows),
        participants: reconcile(&edit.existing_participants, &edit.participant_rows),
    }
}

fn tag(
    kind: MembershipKind,
    reconciled: &Reconciled,
) -> impl Iterator<Item = (MembershipKind, UserId)> + '_ {
    reconciled.duplicates.iter().map(move |user_id| (kind, user_id.clone()))
}

impl DeskEnvironment {
    /// Reconcile `edit` and send it with `update_event`
    ///
    /// Each repeated user produces a warning, even when the edit is then
    /// refused. Nothing is sent when either membership list ends up empty.
    ///
    /// # Errors
    ///
    /// Validation errors for empty membership lists; the API error when the
    /// backend refuses the update.
    pub async fn submit_event_update(&self, edit: &EventEdit) -> Result<Event> {
        let prepared = prepare_update(edit);

        for (kind, user_id) in prepared.duplicates() {
            self.notifier
                .warning(&format!("{user_id} was added more than once as {kind}; keeping the first entry"));
        }

        let payload = match prepared.into_payload() {
            Ok(payload) => payload,
            Err(error) => {
                tracing::debug!(event_id = %edit.event_id, error = %error, "Event update rejected locally");
                self.notifier.error(&error.to_string());
                return Err(error.into());
            },
        };

        match self.api.update_event(edit.event_id.clone(), payload).await {
            Ok(event) => {
                tracing::info!(event_id = %edit.event_id, "Event updated");
                self.notifier.success("Event updated");
                Ok(event)
            },
            Err(error) => {
                tracing::warn!(event_id = %edit.event_id, error = %error, "Event update failed");
                self.notifier.error(&error.reason_or(|| "Could not update event".to_string()));
                Err(error.into())
            },
        }
    }
}
