//! Request and error bodies exchanged with the backend

use eventdesk_core::types::{RoleId, UserId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RegistrationBody {
    pub user_id: UserId,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttendanceBody {
    pub attending: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct LockBody {
    pub locked: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RoleBody {
    pub role_id: RoleId,
}

/// Error payload; only `message` is read, everything else is ignored
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Extract the server message from a raw body, tolerating non-JSON bodies
    pub(crate) fn message_from(body: &str) -> Option<String> {
        serde_json::from_str::<Self>(body)
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
    }
}
