//! Error taxonomy shared by the remote store and the synchronizer

use crate::types::EntityKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `StoreError`
pub type Result<T> = std::result::Result<T, StoreError>;

/// Failure of a remote operation or of local validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A local precondition was violated; no request was made
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Missing or rejected credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Entity vanished on the server
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },

    /// Server could not be reached
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    /// Unexpected server-side failure
    #[error("Server fault: {0}")]
    ServerFault(String),
}

/// Tag of a `StoreError`, for callers that only need to pick a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    ValidationFailed,
    Unauthorized,
    NotFound,
    NetworkUnavailable,
    ServerFault,
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationFailed(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }

    pub fn not_found(kind: EntityKind, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkUnavailable(msg.into())
    }

    pub fn server_fault(msg: impl Into<String>) -> Self {
        Self::ServerFault(msg.into())
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            Self::ValidationFailed(_) => FailureKind::ValidationFailed,
            Self::Unauthorized(_) => FailureKind::Unauthorized,
            Self::NotFound { .. } => FailureKind::NotFound,
            Self::NetworkUnavailable(_) => FailureKind::NetworkUnavailable,
            Self::ServerFault(_) => FailureKind::ServerFault,
        }
    }

    /// Whether re-submitting the same intent later could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::NetworkUnavailable(_) | Self::ServerFault(_)
        )
    }
}
