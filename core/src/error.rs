//! Error types for eventdesk operations.
//!
//! Two families are kept apart on purpose: [`ApiError`] is produced by the
//! backend boundary (one per request) and [`ValidationError`] is produced locally
//! before any request is issued.

use crate::types::UserId;
use thiserror::Error;

/// Errors returned by an [`EventsApi`](crate::environment::EventsApi) call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No bearer token is available
    #[error("Missing access token")]
    MissingToken,

    /// Token rejected by the backend
    #[error("Unauthorized - invalid or expired token")]
    Unauthorized,

    /// Backend answered with a non-success status
    #[error("API error (status {status})")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// `message` field of the error body, when the backend sent one
        message: Option<String>,
    },

    /// Request never produced a response
    #[error("Request failed: {0}")]
    Network(String),

    /// Response body could not be decoded
    #[error("Response parsing failed: {0}")]
    Decode(String),
}

impl ApiError {
    /// Human-readable reason for this failure
    ///
    /// Prefers the server-provided message, then the transport error text, and
    /// falls back to `fallback` when the backend gave no explanation.
    #[must_use]
    pub fn reason_or(&self, fallback: impl FnOnce() -> String) -> String {
        match self {
            Self::Rejected { message: Some(message), .. } if !message.trim().is_empty() => {
                message.clone()
            },
            Self::Rejected { .. } => fallback(),
            Self::Network(message) | Self::Decode(message) => message.clone(),
            Self::MissingToken | Self::Unauthorized => self.to_string(),
        }
    }
}

/// Problems detected locally, before any network call
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A batch operation received no ids
    #[error("No events selected")]
    EmptySelection,

    /// The current user is unknown
    #[error("No signed-in user")]
    MissingUser,

    /// Reconciled organizer list is empty
    #[error("An event needs at least one organizer")]
    NoOrganizers,

    /// Reconciled participant list is empty
    #[error("An event needs at least one participant")]
    NoParticipants,

    /// Creators cannot register to or unregister from their own event
    #[error("You created this event")]
    CreatedBySelf,

    /// Already registered to the event
    #[error("Already registered to this event")]
    AlreadyRegistered,

    /// Not registered to the event
    #[error("Not registered to this event")]
    NotRegistered,

    /// Another change for the same event has not settled yet
    #[error("A change for this event is still in progress")]
    ChangePending,

    /// The row's role is derived from the user's profile
    #[error("Role of {0} is fixed by their profile")]
    RoleLocked(UserId),

    /// Rejections must carry a reason
    #[error("A rejection needs a reason")]
    MissingRejectionReason,

    /// The attendee is not on the loaded sheet
    #[error("{0} is not on the attendance sheet")]
    UnknownAttendee(UserId),

    /// Draft operations require editing mode
    #[error("Attendance is not being edited")]
    NotEditing,
}
