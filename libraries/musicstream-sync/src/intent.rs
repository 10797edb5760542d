//! User intents and their outcomes

use musicstream_core::{Entity, EntityKind, PlaylistId, TrackId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A mutating request from the user, before validation and dispatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    ToggleFavorite {
        track_id: TrackId,
    },
    CreatePlaylist {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    AddTrack {
        playlist_id: PlaylistId,
        track_id: TrackId,
    },
    RemoveTrack {
        playlist_id: PlaylistId,
        track_id: TrackId,
    },
    DeletePlaylist {
        playlist_id: PlaylistId,
    },
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ToggleFavorite { .. } => "toggle_favorite",
            Self::CreatePlaylist { .. } => "create_playlist",
            Self::AddTrack { .. } => "add_track",
            Self::RemoveTrack { .. } => "remove_track",
            Self::DeletePlaylist { .. } => "delete_playlist",
        }
    }

    /// Kind of entity the intent mutates
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::ToggleFavorite { .. } => EntityKind::FavoriteSet,
            _ => EntityKind::Playlist,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ToggleFavorite { track_id } => write!(f, "toggle favorite {}", track_id),
            Self::CreatePlaylist { name, .. } => write!(f, "create playlist {:?}", name),
            Self::AddTrack {
                playlist_id,
                track_id,
            } => write!(f, "add {} to {}", track_id, playlist_id),
            Self::RemoveTrack {
                playlist_id,
                track_id,
            } => write!(f, "remove {} from {}", track_id, playlist_id),
            Self::DeletePlaylist { playlist_id } => write!(f, "delete playlist {}", playlist_id),
        }
    }
}

/// Result of a successfully settled intent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The gateway confirmed and returned the entity's canonical form
    Upserted(Entity),
    /// The gateway confirmed a deletion
    Removed { kind: EntityKind, id: String },
    /// The gateway confirmed favorite membership
    Favorite { track_id: TrackId, favorited: bool },
    /// The projection was left as it was: either the intent was already
    /// satisfied (no network call), or a confirmed deletion superseded the
    /// store's answer
    Unchanged,
}

impl Outcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}
