//! Environment module - Dependency injection traits
//!
//! All external collaborators of the eventdesk logic are abstracted behind the
//! traits in this module and injected through environment structs:
//!
//! - [`EventsApi`]: the REST backend
//! - [`Notifier`]: the toast/notification sink
//! - [`TokenSource`]: where the bearer token is stored
//!
//! # Dyn Compatibility
//!
//! [`EventsApi`] uses explicit `Pin<Box<dyn Future>>` returns instead of
//! `async fn` so it can be shared as `Arc<dyn EventsApi>` and captured by
//! effects running on spawned tasks.

use crate::error::ApiError;
use crate::types::{
    Attendee, Event, EventId, EventUpdate, ReviewDecision, RoleId, UserId,
};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed future returned by [`EventsApi`] methods
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ApiError>> + Send + 'a>>;

/// The REST backend as seen by the client logic
///
/// Every call is independent: a failure never affects other in-flight calls.
pub trait EventsApi: Send + Sync {
    /// List approved events
    fn fetch_approved_events(&self) -> ApiFuture<'_, Vec<Event>>;

    /// Register `user_id` to `event_id`
    fn register_for_event(&self, event_id: EventId, user_id: UserId) -> ApiFuture<'_, ()>;

    /// Remove the registration of `user_id` from `event_id`
    fn unregister_from_event(&self, event_id: EventId, user_id: UserId) -> ApiFuture<'_, ()>;

    /// List the attendees of `event_id`
    fn fetch_attendees(&self, event_id: EventId) -> ApiFuture<'_, Vec<Attendee>>;

    /// Persist the attendance flag of one attendee
    fn set_attendance(
        &self,
        event_id: EventId,
        user_id: UserId,
        attending: bool,
    ) -> ApiFuture<'_, ()>;

    /// Replace the editable fields and memberships of an event
    fn update_event(&self, event_id: EventId, payload: EventUpdate) -> ApiFuture<'_, Event>;

    /// Approve or reject a pending event submission
    fn review_event(&self, event_id: EventId, decision: ReviewDecision) -> ApiFuture<'_, ()>;

    /// Lock or unlock a user account
    fn set_account_locked(&self, user_id: UserId, locked: bool) -> ApiFuture<'_, ()>;

    /// Change the role assigned on a user's profile
    fn assign_role(&self, user_id: UserId, role_id: RoleId) -> ApiFuture<'_, ()>;
}

/// Severity of a user-facing notification
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// Operation went through with caveats
    Warning,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// Sink for user-facing messages
pub trait Notifier: Send + Sync {
    /// Show `text` to the user
    fn notify(&self, kind: NotificationKind, text: &str);

    /// Shorthand for a success notification
    fn success(&self, text: &str) {
        self.notify(NotificationKind::Success, text);
    }

    /// Shorthand for an error notification
    fn error(&self, text: &str) {
        self.notify(NotificationKind::Error, text);
    }

    /// Shorthand for a warning notification
    fn warning(&self, text: &str) {
        self.notify(NotificationKind::Warning, text);
    }
}

/// Notifier that forwards every message to `tracing`
///
/// Used by headless front ends such as the command-line tool.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NotificationKind, text: &str) {
        match kind {
            NotificationKind::Success => tracing::info!(%kind, "{text}"),
            NotificationKind::Warning => tracing::warn!(%kind, "{text}"),
            NotificationKind::Error => tracing::error!(%kind, "{text}"),
        }
    }
}

/// Provides the bearer token for authenticated requests
pub trait TokenSource: Send + Sync {
    /// Current token, if the user is signed in
    fn bearer_token(&self) -> Option<String>;
}
