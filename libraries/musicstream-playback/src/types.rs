//! Core types for the playback session

use musicstream_core::{Track, TrackId};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default volume for a new session
pub const DEFAULT_VOLUME: f32 = 0.7;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No track loaded
    Empty,
    /// Track loaded, not playing
    Paused,
    /// Track loaded and playing
    Playing,
}

impl SessionState {
    pub fn is_loaded(&self) -> bool {
        !matches!(self, Self::Empty)
    }
}

/// Direction for `advance`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Next,
    Previous,
}

/// Snapshot of the loaded track.
///
/// Copied out of the projection at load time so later projection changes
/// cannot disturb playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlaying {
    pub track_id: TrackId,
    pub title: String,
    pub artist: String,
    pub duration: Duration,
    pub audio_url: String,
}

impl From<&Track> for NowPlaying {
    fn from(track: &Track) -> Self {
        Self {
            track_id: track.id.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            duration: track.duration(),
            audio_url: track.audio_url.clone(),
        }
    }
}

/// Render a duration as `m:ss`
pub fn format_time(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
