//! CLI error types

use musicstream_client::ClientError;
use musicstream_core::StoreError;
use musicstream_playback::PlaybackError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Client error: {0}")]
    Client(#[from] ClientError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Not found: {0}")]
    NotFound(String),
}
