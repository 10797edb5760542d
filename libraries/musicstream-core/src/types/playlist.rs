//! Playlist domain types

use super::ids::{PlaylistId, TrackId, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A user playlist
///
/// `track_ids` is an ordered set: it never holds the same id twice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[serde(alias = "_id")]
    pub id: PlaylistId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(rename = "musicIds", default)]
    pub track_ids: Vec<TrackId>,
}

impl Playlist {
    /// Whether the playlist holds `track_id`
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.track_ids.contains(track_id)
    }

    /// Number of track references (dangling ones included)
    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    /// Drop repeated track ids, keeping the first occurrence of each.
    pub fn dedup_tracks(&mut self) {
        let mut seen = HashSet::with_capacity(self.track_ids.len());
        self.track_ids.retain(|id| seen.insert(id.clone()));
    }
}

/// Data for creating a new playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePlaylist {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl CreatePlaylist {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: name.into(),
            description,
        }
    }
}

/// A single change to an existing playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PlaylistUpdate {
    AddTrack { track_id: TrackId },
    RemoveTrack { track_id: TrackId },
    /// Gateway-level operation. No synchronizer intent issues it; callers
    /// holding a `RemoteStore` may.
    Rename {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}
