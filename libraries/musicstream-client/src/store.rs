//! `RemoteStore` implementation over the MusicStream REST API.

use crate::client::{decode, MusicStreamClient};
use crate::types::{CollectionBody, PlaylistBody};
use async_trait::async_trait;
use musicstream_core::{
    Entity, EntityKind, EntityPayload, FavoriteSet, Playlist, PlaylistUpdate, RemoteStore,
    Result, StoreError, Track, TrackId,
};
use reqwest::StatusCode;
use tracing::debug;

fn unsupported(operation: &str, kind: EntityKind) -> StoreError {
    StoreError::validation(format!("{} is not supported for {}", operation, kind))
}

fn check_payload_kind(kind: EntityKind, payload: &EntityPayload) -> Result<()> {
    if payload.kind() == kind {
        Ok(())
    } else {
        Err(StoreError::validation(format!(
            "{} payload sent for {}",
            payload.kind(),
            kind
        )))
    }
}

#[async_trait]
impl RemoteStore for MusicStreamClient {
    async fn fetch_collection(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        let entities = match kind {
            EntityKind::Track => {
                let url = self.endpoint(&["api", "music"])?;
                debug!(url = %url, "Fetching tracks");
                let response = self.send(self.http().get(url), &[]).await?;
                let body: CollectionBody<Track> = decode(response, "track list").await?;
                body.into_vec().into_iter().map(Entity::Track).collect()
            }
            EntityKind::Playlist => {
                let url = self.endpoint(&["api", "playlist"])?;
                debug!(url = %url, "Fetching playlists");
                let response = self.send(self.http().get(url), &[]).await?;
                let body: CollectionBody<Playlist> = decode(response, "playlist list").await?;
                body.into_vec().into_iter().map(Entity::Playlist).collect()
            }
            EntityKind::FavoriteSet => {
                let url = self.endpoint(&["api", "favorites"])?;
                debug!(url = %url, "Fetching favorites");
                let response = self.send(self.http().get(url), &[]).await?;
                let favorites: FavoriteSet = decode(response, "favorites").await?;
                vec![Entity::FavoriteSet(favorites)]
            }
        };

        debug!(kind = %kind, count = entities.len(), "Fetched collection");
        Ok(entities)
    }

    async fn create_entity(&self, kind: EntityKind, payload: EntityPayload) -> Result<Entity> {
        check_payload_kind(kind, &payload)?;

        let EntityPayload::CreatePlaylist(create) = payload else {
            return Err(unsupported("update payload on create", kind));
        };

        let url = self.endpoint(&["api", "playlist"])?;
        debug!(url = %url, name = %create.name, "Creating playlist");

        let body = PlaylistBody {
            name: &create.name,
            description: create.description.as_deref(),
        };
        let response = self
            .send(self.http().post(url).json(&body), &[])
            .await?;
        let playlist: Playlist = decode(response, "playlist").await?;

        debug!(playlist_id = %playlist.id, "Playlist created");
        Ok(Entity::Playlist(playlist))
    }

    async fn update_entity(
        &self,
        kind: EntityKind,
        id: &str,
        payload: EntityPayload,
    ) -> Result<Entity> {
        check_payload_kind(kind, &payload)?;

        let EntityPayload::UpdatePlaylist(update) = payload else {
            return Err(unsupported("create payload on update", kind));
        };

        // A 404 on a track route may mean the track is gone, not the playlist
        let (request, targets) = match &update {
            PlaylistUpdate::AddTrack { track_id } => (
                self.http()
                    .post(self.endpoint(&["api", "playlist", id, "music", track_id.as_str()])?),
                vec![(kind, id), (EntityKind::Track, track_id.as_str())],
            ),
            PlaylistUpdate::RemoveTrack { track_id } => (
                self.http()
                    .delete(self.endpoint(&["api", "playlist", id, "music", track_id.as_str()])?),
                vec![(kind, id), (EntityKind::Track, track_id.as_str())],
            ),
            PlaylistUpdate::Rename { name, description } => (
                self.http()
                    .put(self.endpoint(&["api", "playlist", id])?)
                    .json(&PlaylistBody {
                        name,
                        description: description.as_deref(),
                    }),
                vec![(kind, id)],
            ),
        };

        debug!(playlist_id = %id, update = ?update, "Updating playlist");
        let response = self.send(request, &targets).await?;
        let playlist: Playlist = decode(response, "playlist").await?;

        Ok(Entity::Playlist(playlist))
    }

    async fn delete_entity(&self, kind: EntityKind, id: &str) -> Result<()> {
        if kind != EntityKind::Playlist {
            return Err(unsupported("delete", kind));
        }

        let url = self.endpoint(&["api", "playlist", id])?;
        debug!(url = %url, playlist_id = %id, "Deleting playlist");

        self.send(self.http().delete(url), &[(kind, id)]).await?;

        debug!(playlist_id = %id, "Playlist deleted");
        Ok(())
    }

    async fn toggle_favorite(&self, track_id: &TrackId) -> Result<Option<FavoriteSet>> {
        let url = self.endpoint(&["api", "favorites", track_id.as_str(), "toggle"])?;
        debug!(url = %url, track_id = %track_id, "Toggling favorite");

        let response = self
            .send(self.http().post(url), &[(EntityKind::Track, track_id.as_str())])
            .await?;

        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| StoreError::server_fault(format!("Failed to read favorites: {}", e)))?;
        if body.is_empty() {
            return Ok(None);
        }

        let favorites: FavoriteSet = serde_json::from_slice(&body).map_err(|e| {
            StoreError::server_fault(format!("Failed to parse favorites response: {}", e))
        })?;
        Ok(Some(favorites))
    }
}
