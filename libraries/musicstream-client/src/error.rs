//! Error types for the MusicStream client.

use thiserror::Error;

/// Errors raised while building a client.
///
/// Failures of remote operations are reported as
/// [`musicstream_core::StoreError`] instead.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// HTTP client could not be constructed
    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for client construction.
pub type Result<T> = std::result::Result<T, ClientError>;
