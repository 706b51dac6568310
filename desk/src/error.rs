//! Error type returned by the application flows

use eventdesk_core::error::{ApiError, ValidationError};
use thiserror::Error;

/// Result type alias for eventdesk flows
pub type Result<T> = std::result::Result<T, DeskError>;

/// A flow either stopped locally or was refused by the backend
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeskError {
    /// Rejected before any network call
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl DeskError {
    /// Whether the flow stopped before touching the network
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
