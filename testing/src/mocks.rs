//! Mock implementations of the environment traits
//!
//! [`MockEventsApi`] answers from in-memory fixtures and records every call.
//! Failures and latencies are scripted per event or per user, which is enough
//! to drive partial-failure batches and out-of-order settlement.

use eventdesk_core::environment::{ApiFuture, EventsApi, NotificationKind, Notifier};
use eventdesk_core::error::ApiError;
use eventdesk_core::types::{
    Attendee, Event, EventId, EventUpdate, ReviewDecision, RoleId, UserId,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// One recorded call to [`MockEventsApi`]
#[derive(Clone, Debug, PartialEq)]
pub enum ApiCall {
    /// `fetch_approved_events`
    FetchApprovedEvents,
    /// `register_for_event`
    Register {
        /// Event
        event_id: EventId,
        /// User
        user_id: UserId,
    },
    /// `unregister_from_event`
    Unregister {
        /// Event
        event_id: EventId,
        /// User
        user_id: UserId,
    },
    /// `fetch_attendees`
    FetchAttendees {
        /// Event
        event_id: EventId,
    },
    /// `set_attendance`
    SetAttendance {
        /// Event
        event_id: EventId,
        /// User
        user_id: UserId,
        /// New flag
        attending: bool,
    },
    /// `update_event`
    UpdateEvent {
        /// Event
        event_id: EventId,
        /// Submitted payload
        payload: EventUpdate,
    },
    /// `review_event`
    ReviewEvent {
        /// Event
        event_id: EventId,
        /// Decision taken
        decision: ReviewDecision,
    },
    /// `set_account_locked`
    SetAccountLocked {
        /// User
        user_id: UserId,
        /// New lock state
        locked: bool,
    },
    /// `assign_role`
    AssignRole {
        /// User
        user_id: UserId,
        /// New role
        role_id: RoleId,
    },
}

/// Scriptable in-memory backend
#[derive(Debug, Default)]
pub struct MockEventsApi {
    events: Mutex<Vec<Event>>,
    attendees: Mutex<HashMap<EventId, Vec<Attendee>>>,
    event_failures: Mutex<HashMap<EventId, ApiError>>,
    user_failures: Mutex<HashMap<UserId, ApiError>>,
    delays: Mutex<HashMap<EventId, Duration>>,
    calls: Mutex<Vec<ApiCall>>,
}

impl MockEventsApi {
    /// Empty backend where every call succeeds
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `events` from `fetch_approved_events`
    #[must_use]
    pub fn with_events(self, events: Vec<Event>) -> Self {
        *lock(&self.events) = events;
        self
    }

    /// Serve `attendees` from `fetch_attendees(event_id)`
    #[must_use]
    pub fn with_attendees(self, event_id: impl Into<EventId>, attendees: Vec<Attendee>) -> Self {
        lock(&self.attendees).insert(event_id.into(), attendees);
        self
    }

    /// Make every event-scoped call for `event_id` fail with `error`
    pub fn fail_event(&self, event_id: impl Into<EventId>, error: ApiError) {
        lock(&self.event_failures).insert(event_id.into(), error);
    }

    /// Make every user-scoped call for `user_id` fail with `error`
    pub fn fail_user(&self, user_id: impl Into<UserId>, error: ApiError) {
        lock(&self.user_failures).insert(user_id.into(), error);
    }

    /// Let every call succeed again
    pub fn clear_failures(&self) {
        lock(&self.event_failures).clear();
        lock(&self.user_failures).clear();
    }

    /// Delay every event-scoped call for `event_id`
    pub fn delay_event(&self, event_id: impl Into<EventId>, delay: Duration) {
        lock(&self.delays).insert(event_id.into(), delay);
    }

    /// All calls received so far, in arrival order
    #[must_use]
    pub fn calls(&self) -> Vec<ApiCall> {
        lock(&self.calls).clone()
    }

    /// Number of calls received so far
    #[must_use]
    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Events whose `unregister_from_event` was called
    #[must_use]
    pub fn unregistered_events(&self) -> Vec<EventId> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                ApiCall::Unregister { event_id, .. } => Some(event_id.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: ApiCall) {
        lock(&self.calls).push(call);
    }

    async fn event_outcome(&self, event_id: &EventId) -> Result<(), ApiError> {
        let delay = lock(&self.delays).get(event_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match lock(&self.event_failures).get(event_id) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn user_outcome(&self, user_id: &UserId) -> Result<(), ApiError> {
        match lock(&self.user_failures).get(user_id) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

impl EventsApi for MockEventsApi {
    fn fetch_approved_events(&self) -> ApiFuture<'_, Vec<Event>> {
        Box::pin(async move {
            self.record(ApiCall::FetchApprovedEvents);
            Ok(lock(&self.events).clone())
        })
    }

    fn register_for_event(&self, event_id: EventId, user_id: UserId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.record(ApiCall::Register { event_id: event_id.clone(), user_id });
            self.event_outcome(&event_id).await
        })
    }

    fn unregister_from_event(&self, event_id: EventId, user_id: UserId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.record(ApiCall::Unregister { event_id: event_id.clone(), user_id });
            self.event_outcome(&event_id).await
        })
    }

    fn fetch_attendees(&self, event_id: EventId) -> ApiFuture<'_, Vec<Attendee>> {
        Box::pin(async move {
            self.record(ApiCall::FetchAttendees { event_id: event_id.clone() });
            self.event_outcome(&event_id).await?;
            Ok(lock(&self.attendees).get(&event_id).cloned().unwrap_or_default())
        })
    }

    fn set_attendance(
        &self,
        event_id: EventId,
        user_id: UserId,
        attending: bool,
    ) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.record(ApiCall::SetAttendance {
                event_id: event_id.clone(),
                user_id: user_id.clone(),
                attending,
            });
            self.event_outcome(&event_id).await?;
            self.user_outcome(&user_id)
        })
    }

    fn update_event(&self, event_id: EventId, payload: EventUpdate) -> ApiFuture<'_, Event> {
        Box::pin(async move {
            let title = payload.title.clone().unwrap_or_else(|| "Updated event".to_string());
            self.record(ApiCall::UpdateEvent { event_id: event_id.clone(), payload });
            self.event_outcome(&event_id).await?;
            Ok(Event::new(event_id, title))
        })
    }

    fn review_event(&self, event_id: EventId, decision: ReviewDecision) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.record(ApiCall::ReviewEvent { event_id: event_id.clone(), decision });
            self.event_outcome(&event_id).await
        })
    }

    fn set_account_locked(&self, user_id: UserId, locked: bool) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.record(ApiCall::SetAccountLocked { user_id: user_id.clone(), locked });
            self.user_outcome(&user_id)
        })
    }

    fn assign_role(&self, user_id: UserId, role_id: RoleId) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            self.record(ApiCall::AssignRole { user_id: user_id.clone(), role_id });
            self.user_outcome(&user_id)
        })
    }
}

/// Notifier that remembers every message
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    /// Empty recorder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notification in emission order
    #[must_use]
    pub fn messages(&self) -> Vec<(NotificationKind, String)> {
        lock(&self.messages).clone()
    }

    /// Texts of the notifications of one kind
    #[must_use]
    pub fn texts(&self, kind: NotificationKind) -> Vec<String> {
        lock(&self.messages)
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Whether nothing was emitted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.messages).is_empty()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, text: &str) {
        lock(&self.messages).push((kind, text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn scripted_failures_apply_per_event() {
        let api = MockEventsApi::new();
        api.fail_event("e2", ApiError::Network("down".into()));

        let ok = tokio_test::block_on(api.unregister_from_event("e1".into(), "u".into()));
        let failed = tokio_test::block_on(api.unregister_from_event("e2".into(), "u".into()));

        assert!(ok.is_ok());
        assert_eq!(failed.unwrap_err(), ApiError::Network("down".into()));
        assert_eq!(api.unregistered_events(), vec![EventId::new("e1"), EventId::new("e2")]);
    }

    #[test]
    fn attendees_default_to_empty() {
        let api = MockEventsApi::new().with_attendees("e1", vec![Attendee::new("u1")]);
        let known = tokio_test::block_on(api.fetch_attendees("e1".into())).unwrap();
        let unknown = tokio_test::block_on(api.fetch_attendees("e9".into())).unwrap();
        assert_eq!(known.len(), 1);
        assert!(unknown.is_empty());
    }

    #[test]
    fn recorder_filters_by_kind() {
        let notifier = RecordingNotifier::new();
        notifier.success("done");
        notifier.warning("careful");
        assert_eq!(notifier.texts(NotificationKind::Warning), vec!["careful".to_string()]);
        assert_eq!(notifier.messages().len(), 2);
    }
}
