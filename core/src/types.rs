//! Domain types shared by every eventdesk crate.
//!
//! Identifiers are opaque strings issued by the backend. Wire types use
//! camelCase field names to match the REST API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[doc = concat!("Creates a `", stringify!($name), "` from any string-like value")]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the raw identifier
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is empty or whitespace only
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

string_id!(
    /// Identifier of an event
    EventId
);
string_id!(
    /// Identifier of a user account
    UserId
);
string_id!(
    /// Identifier of a role (organizer or participant role)
    RoleId
);
string_id!(
    /// Identifier of a position held within an event
    PositionId
);

// ============================================================================
// Events
// ============================================================================

/// Review status of an event submission
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Waiting for an administrator
    #[default]
    Pending,
    /// Published and open for registration
    Approved,
    /// Rejected by an administrator
    Rejected,
}

/// An event as returned by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event identifier
    pub id: EventId,
    /// Display title
    pub title: String,
    /// Optional long description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Optional venue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Start time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// End time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Review status
    #[serde(default)]
    pub status: EventStatus,
    /// User that submitted the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<UserId>,
    /// Users currently registered
    #[serde(default)]
    pub registered_user_ids: Vec<UserId>,
}

impl Event {
    /// Minimal approved event, mostly useful in tests and fixtures
    #[must_use]
    pub fn new(id: impl Into<EventId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            location: None,
            start_time: None,
            end_time: None,
            status: EventStatus::Approved,
            created_by: None,
            registered_user_ids: Vec::new(),
        }
    }

    /// Whether `user_id` submitted this event
    #[must_use]
    pub fn is_created_by(&self, user_id: &UserId) -> bool {
        self.created_by.as_ref() == Some(user_id)
    }

    /// Whether `user_id` is registered to this event
    #[must_use]
    pub fn has_registered(&self, user_id: &UserId) -> bool {
        self.registered_user_ids.contains(user_id)
    }
}

/// Administrator decision on an event submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum ReviewDecision {
    /// Publish the event
    Approve,
    /// Reject the event with a reason shown to the submitter
    Reject {
        /// Why the submission was rejected
        reason: String,
    },
}

// ============================================================================
// Attendees
// ============================================================================

/// A user attached to an event, as listed on the attendance sheet
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    /// User identifier
    pub user_id: UserId,
    /// Given name
    #[serde(default)]
    pub first_name: Option<String>,
    /// Family name
    #[serde(default)]
    pub last_name: Option<String>,
    /// Login name
    #[serde(default)]
    pub username: Option<String>,
    /// Student code
    #[serde(default)]
    pub student_code: Option<String>,
    /// Role label (display only)
    #[serde(default)]
    pub role_name: Option<String>,
    /// Position label (display only)
    #[serde(default)]
    pub position_name: Option<String>,
    /// Whether the attendee has been checked in
    #[serde(default)]
    pub is_attending: bool,
}

impl Attendee {
    /// Attendee with only an id, not attending
    #[must_use]
    pub fn new(user_id: impl Into<UserId>) -> Self {
        Self {
            user_id: user_id.into(),
            first_name: None,
            last_name: None,
            username: None,
            student_code: None,
            role_name: None,
            position_name: None,
            is_attending: false,
        }
    }

    /// Set first and last name
    #[must_use]
    pub fn with_name(mut self, last_name: &str, first_name: &str) -> Self {
        self.last_name = Some(last_name.to_string());
        self.first_name = Some(first_name.to_string());
        self
    }

    /// Set username
    #[must_use]
    pub fn with_username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    /// Set student code
    #[must_use]
    pub fn with_student_code(mut self, code: &str) -> Self {
        self.student_code = Some(code.to_string());
        self
    }

    /// Set the attendance flag
    #[must_use]
    pub const fn attending(mut self, is_attending: bool) -> Self {
        self.is_attending = is_attending;
        self
    }
}

// ============================================================================
// Memberships
// ============================================================================

/// Which membership list a record belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipKind {
    /// Organizing team
    Organizer,
    /// Participants
    Participant,
}

impl fmt::Display for MembershipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Organizer => write!(f, "organizer"),
            Self::Participant => write!(f, "participant"),
        }
    }
}

/// One persisted membership of a user in an event
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    /// Member
    pub user_id: UserId,
    /// Role held
    pub role_id: RoleId,
    /// Position held
    pub position_id: PositionId,
}

impl Membership {
    /// Build a membership from its three identifiers
    #[must_use]
    pub fn new(
        user_id: impl Into<UserId>,
        role_id: impl Into<RoleId>,
        position_id: impl Into<PositionId>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            role_id: role_id.into(),
            position_id: position_id.into(),
        }
    }
}

/// Profile data needed to decide whether a participant's role is editable
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// User identifier
    pub user_id: UserId,
    /// Organizer role assigned on the user's profile, if any
    #[serde(default)]
    pub organizer_role_id: Option<RoleId>,
}

/// Payload of an event update
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventUpdate {
    /// New title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New venue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// New start time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    /// New end time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    /// Complete organizer list
    pub organizers: Vec<Membership>,
    /// Complete participant list
    pub participants: Vec<Membership>,
}
