//! Track domain type
//!
//! Tracks are created by the upload collaborator and are immutable from the
//! client's point of view.

use super::ids::{TrackId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A track in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Server-assigned identifier (`_id` from the document store is accepted)
    #[serde(alias = "_id")]
    pub id: TrackId,
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub genre: String,

    /// Length in whole seconds
    #[serde(rename = "duration", default)]
    pub duration_secs: u32,

    #[serde(default)]
    pub cover_url: String,
    pub audio_url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Track length as a `Duration`
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }

    /// Case-insensitive match against title, artist or genre.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.artist.to_lowercase().contains(needle)
            || self.genre.to_lowercase().contains(needle)
    }
}
