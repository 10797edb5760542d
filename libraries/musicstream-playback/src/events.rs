//! Playback Events
//!
//! Queued by the session and drained by the UI layer.

use crate::types::SessionState;
use musicstream_core::TrackId;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Session state changed
    StateChanged { state: SessionState },

    /// A different track (or the same track, restarted) was loaded
    TrackChanged {
        track_id: TrackId,
        previous_track_id: Option<TrackId>,
    },

    /// Position moved by a seek or a media update
    PositionChanged { position: Duration },

    /// Effective output volume changed
    VolumeChanged { volume: f32, muted: bool },

    /// Track reached its natural end
    TrackFinished { track_id: TrackId },
}
