//! Kind-tagged entity wrappers used at the remote store boundary

use super::{CreatePlaylist, FavoriteSet, Playlist, PlaylistUpdate, Track};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collections the client mirrors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Track,
    Playlist,
    FavoriteSet,
}

impl EntityKind {
    /// All kinds, in the order a full refresh fetches them
    pub const ALL: [EntityKind; 3] = [Self::Track, Self::Playlist, Self::FavoriteSet];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Track => "track",
            Self::Playlist => "playlist",
            Self::FavoriteSet => "favorite_set",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entity of any kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entity", rename_all = "snake_case")]
pub enum Entity {
    Track(Track),
    Playlist(Playlist),
    FavoriteSet(FavoriteSet),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Track(_) => EntityKind::Track,
            Self::Playlist(_) => EntityKind::Playlist,
            Self::FavoriteSet(_) => EntityKind::FavoriteSet,
        }
    }

    /// Entity id; the favorite set is a per-user singleton and has none.
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Track(track) => Some(track.id.as_str()),
            Self::Playlist(playlist) => Some(playlist.id.as_str()),
            Self::FavoriteSet(_) => None,
        }
    }

    pub fn into_track(self) -> Option<Track> {
        match self {
            Self::Track(track) => Some(track),
            _ => None,
        }
    }

    pub fn into_playlist(self) -> Option<Playlist> {
        match self {
            Self::Playlist(playlist) => Some(playlist),
            _ => None,
        }
    }

    pub fn into_favorites(self) -> Option<FavoriteSet> {
        match self {
            Self::FavoriteSet(favorites) => Some(favorites),
            _ => None,
        }
    }
}

/// Request body for create and update operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityPayload {
    CreatePlaylist(CreatePlaylist),
    UpdatePlaylist(PlaylistUpdate),
}

impl EntityPayload {
    /// Kind of entity this payload applies to
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::CreatePlaylist(_) | Self::UpdatePlaylist(_) => EntityKind::Playlist,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlaylistId, TrackId, UserId};

    #[test]
    fn kind_and_id() {
        let playlist = Entity::Playlist(Playlist {
            id: PlaylistId::new("p1"),
            name: "Chill".to_string(),
            description: None,
            owner_id: UserId::new("u1"),
            cover_url: None,
            track_ids: vec![],
        });
        assert_eq!(playlist.kind(), EntityKind::Playlist);
        assert_eq!(playlist.id(), Some("p1"));

        let favorites = Entity::FavoriteSet(FavoriteSet::new());
        assert_eq!(favorites.kind(), EntityKind::FavoriteSet);
        assert_eq!(favorites.id(), None);
        assert!(favorites.into_playlist().is_none());
    }

    #[test]
    fn payload_kind() {
        let payload = EntityPayload::UpdatePlaylist(PlaylistUpdate::AddTrack {
            track_id: TrackId::new("1"),
        });
        assert_eq!(payload.kind(), EntityKind::Playlist);
    }

    #[test]
    fn kind_display() {
        assert_eq!(EntityKind::FavoriteSet.to_string(), "favorite_set");
    }
}
