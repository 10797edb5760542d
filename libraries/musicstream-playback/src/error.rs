//! Error types for the playback session

use thiserror::Error;

/// Playback errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Operation needs a loaded track
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The media element rejected a command
    #[error("Media error: {0}")]
    Media(String),
}

impl PlaybackError {
    pub fn media(msg: impl Into<String>) -> Self {
        Self::Media(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
