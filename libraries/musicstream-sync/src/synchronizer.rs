//! Confirm-only synchronizer
//!
//! Every intent goes through the same protocol:
//!
//! 1. validate against the projection, with no network call
//! 2. dispatch through the [`RemoteStore`]
//! 3. on success, overwrite the projection with what the store returned
//! 4. on failure, leave the projection untouched and return the failure
//!
//! The projection lock is only taken for short synchronous sections and is
//! never held across a remote call, so intents may overlap. Reconciliations
//! apply in completion order, except that a confirmed playlist deletion is
//! final until a playlist refresh shows the id on the server again.

use crate::events::SyncEvent;
use crate::intent::{Intent, Outcome};
use crate::projection::LocalProjection;
use musicstream_core::{
    CreatePlaylist, Entity, EntityKind, EntityPayload, PlaylistId, PlaylistUpdate, RemoteStore,
    Result, StoreError, TrackId,
};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

const EVENT_CAPACITY: usize = 256;

/// Remote call chosen by validation
#[derive(Debug)]
enum Dispatch {
    Create(CreatePlaylist),
    Update {
        playlist_id: PlaylistId,
        update: PlaylistUpdate,
    },
    Delete(PlaylistId),
    ToggleFavorite {
        track_id: TrackId,
        /// Membership the user asked for, captured at issue time
        favorited: bool,
    },
}

/// Owns the local projection and keeps it converged with a remote store
pub struct Synchronizer<S: ?Sized> {
    store: Arc<S>,
    projection: RwLock<LocalProjection>,
    events: broadcast::Sender<SyncEvent>,
}

impl<S: RemoteStore + ?Sized> Synchronizer<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_projection(store, LocalProjection::new())
    }

    /// Start from an already populated projection
    pub fn with_projection(store: Arc<S>, projection: LocalProjection) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            projection: RwLock::new(projection),
            events,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Receive events for every dispatched intent and projection change
    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Read access to the projection.
    ///
    /// Do not hold the guard across an `.await`.
    pub fn projection(&self) -> RwLockReadGuard<'_, LocalProjection> {
        self.projection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of one collection in last-known server order
    pub fn get_projection(&self, kind: EntityKind) -> Vec<Entity> {
        self.projection().list(kind)
    }

    /// Owned copy of the whole projection
    pub fn snapshot(&self) -> LocalProjection {
        self.projection().clone()
    }

    fn projection_mut(&self) -> RwLockWriteGuard<'_, LocalProjection> {
        self.projection
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Fetch every collection and replace the projection with the results
    pub async fn refresh(&self) -> Result<()> {
        for kind in EntityKind::ALL {
            self.refresh_kind(kind).await?;
        }
        Ok(())
    }

    /// Fetch one collection and replace it. Returns the number of entities.
    pub async fn refresh_kind(&self, kind: EntityKind) -> Result<usize> {
        debug!(kind = %kind, "Refreshing collection");
        let entities = self.store.fetch_collection(kind).await.map_err(|e| {
            warn!(kind = %kind, error = %e, "Refresh failed");
            e
        })?;

        let count = entities.len();
        self.projection_mut().replace_collection(kind, entities);

        info!(kind = %kind, count, "Collection refreshed");
        self.emit(SyncEvent::CollectionReplaced { kind, count });
        Ok(count)
    }

    // =========================================================================
    // Intents
    // =========================================================================

    /// Validate, dispatch and reconcile one intent
    pub async fn submit(&self, intent: Intent) -> Result<Outcome> {
        let dispatch = match self.validate(&intent) {
            Ok(Some(dispatch)) => dispatch,
            Ok(None) => {
                debug!(intent = %intent, "Intent already satisfied locally");
                return Ok(Outcome::Unchanged);
            }
            Err(e) => {
                debug!(intent = %intent, error = %e, "Intent rejected");
                return Err(e);
            }
        };

        let ticket = Uuid::new_v4();
        info!(%ticket, intent = %intent, "Dispatching intent");
        self.emit(SyncEvent::IntentDispatched {
            ticket,
            intent: intent.clone(),
        });

        let result = self.dispatch(dispatch).await;

        match &result {
            Ok(outcome) => debug!(%ticket, outcome = ?outcome, "Intent confirmed"),
            Err(e) => warn!(%ticket, intent = %intent, error = %e, "Intent failed"),
        }
        self.emit(SyncEvent::IntentSettled {
            ticket,
            failure: result.as_ref().err().map(StoreError::kind),
        });

        result
    }

    pub async fn toggle_favorite(&self, track_id: TrackId) -> Result<Outcome> {
        self.submit(Intent::ToggleFavorite { track_id }).await
    }

    pub async fn create_playlist(
        &self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<Outcome> {
        self.submit(Intent::CreatePlaylist {
            name: name.into(),
            description,
        })
        .await
    }

    pub async fn add_to_playlist(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<Outcome> {
        self.submit(Intent::AddTrack {
            playlist_id,
            track_id,
        })
        .await
    }

    pub async fn remove_from_playlist(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<Outcome> {
        self.submit(Intent::RemoveTrack {
            playlist_id,
            track_id,
        })
        .await
    }

    pub async fn delete_playlist(&self, playlist_id: PlaylistId) -> Result<Outcome> {
        self.submit(Intent::DeletePlaylist { playlist_id }).await
    }

    /// Check local preconditions. `Ok(None)` means the intent is already
    /// satisfied and needs no remote call.
    fn validate(&self, intent: &Intent) -> Result<Option<Dispatch>> {
        let projection = self.projection();

        let dispatch = match intent {
            Intent::ToggleFavorite { track_id } => {
                if !projection.has_track(track_id) {
                    return Err(StoreError::validation(format!(
                        "Unknown track: {}",
                        track_id
                    )));
                }
                Dispatch::ToggleFavorite {
                    track_id: track_id.clone(),
                    favorited: !projection.is_favorite(track_id),
                }
            }
            Intent::CreatePlaylist { name, description } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(StoreError::validation("Playlist name cannot be empty"));
                }
                Dispatch::Create(CreatePlaylist::new(name, description.clone()))
            }
            Intent::AddTrack {
                playlist_id,
                track_id,
            } => {
                let playlist = projection.playlist(playlist_id).ok_or_else(|| {
                    StoreError::validation(format!("Unknown playlist: {}", playlist_id))
                })?;
                if !projection.has_track(track_id) {
                    return Err(StoreError::validation(format!(
                        "Unknown track: {}",
                        track_id
                    )));
                }
                if playlist.contains(track_id) {
                    return Ok(None);
                }
                Dispatch::Update {
                    playlist_id: playlist_id.clone(),
                    update: PlaylistUpdate::AddTrack {
                        track_id: track_id.clone(),
                    },
                }
            }
            Intent::RemoveTrack {
                playlist_id,
                track_id,
            } => {
                let playlist = projection.playlist(playlist_id).ok_or_else(|| {
                    StoreError::validation(format!("Unknown playlist: {}", playlist_id))
                })?;
                if !playlist.contains(track_id) {
                    return Ok(None);
                }
                Dispatch::Update {
                    playlist_id: playlist_id.clone(),
                    update: PlaylistUpdate::RemoveTrack {
                        track_id: track_id.clone(),
                    },
                }
            }
            Intent::DeletePlaylist { playlist_id } => {
                if projection.playlist(playlist_id).is_none() {
                    return Err(StoreError::validation(format!(
                        "Unknown playlist: {}",
                        playlist_id
                    )));
                }
                Dispatch::Delete(playlist_id.clone())
            }
        };

        Ok(Some(dispatch))
    }

    async fn dispatch(&self, dispatch: Dispatch) -> Result<Outcome> {
        match dispatch {
            Dispatch::Create(create) => {
                let entity = self
                    .store
                    .create_entity(EntityKind::Playlist, EntityPayload::CreatePlaylist(create))
                    .await?;
                self.reconcile_playlist(entity)
            }
            Dispatch::Update {
                playlist_id,
                update,
            } => {
                let result = self
                    .store
                    .update_entity(
                        EntityKind::Playlist,
                        playlist_id.as_str(),
                        EntityPayload::UpdatePlaylist(update),
                    )
                    .await;
                match result {
                    Ok(entity) => self.reconcile_playlist(entity),
                    Err(e) => {
                        self.heal_not_found(&e);
                        Err(e)
                    }
                }
            }
            Dispatch::Delete(playlist_id) => {
                match self
                    .store
                    .delete_entity(EntityKind::Playlist, playlist_id.as_str())
                    .await
                {
                    Ok(()) => {}
                    Err(StoreError::NotFound { .. }) => {
                        debug!(playlist_id = %playlist_id, "Playlist already gone on server");
                    }
                    Err(e) => return Err(e),
                }
                self.projection_mut().tombstone(&playlist_id);
                self.emit(SyncEvent::EntityRemoved {
                    kind: EntityKind::Playlist,
                    id: playlist_id.as_str().to_string(),
                });
                Ok(Outcome::Removed {
                    kind: EntityKind::Playlist,
                    id: playlist_id.as_str().to_string(),
                })
            }
            Dispatch::ToggleFavorite {
                track_id,
                favorited,
            } => match self.store.toggle_favorite(&track_id).await {
                Ok(returned) => {
                    let favorited = {
                        let mut projection = self.projection_mut();
                        match returned {
                            Some(set) => {
                                let confirmed = set.contains(&track_id);
                                projection.upsert(Entity::FavoriteSet(set));
                                confirmed
                            }
                            None => {
                                projection.set_favorite(&track_id, favorited);
                                favorited
                            }
                        }
                    };
                    self.emit(SyncEvent::FavoriteChanged {
                        track_id: track_id.clone(),
                        favorited,
                    });
                    Ok(Outcome::Favorite {
                        track_id,
                        favorited,
                    })
                }
                Err(e) => {
                    self.heal_not_found(&e);
                    Err(e)
                }
            },
        }
    }

    /// Overwrite a playlist with the store's answer
    fn reconcile_playlist(&self, entity: Entity) -> Result<Outcome> {
        if entity.kind() != EntityKind::Playlist {
            return Err(StoreError::server_fault(format!(
                "Expected a playlist, store returned a {}",
                entity.kind()
            )));
        }
        let id = entity.id().unwrap_or_default().to_string();

        let applied = self.projection_mut().upsert(entity.clone());
        if !applied {
            debug!(playlist_id = %id, "Ignoring reconciliation for deleted playlist");
            return Ok(Outcome::Unchanged);
        }

        self.emit(SyncEvent::EntityUpserted {
            kind: EntityKind::Playlist,
            id,
        });
        Ok(Outcome::Upserted(entity))
    }

    /// Self-heal after the store reported an entity missing. The error
    /// names the entity, which on a track route may be the track rather
    /// than the playlist.
    fn heal_not_found(&self, err: &StoreError) {
        if let StoreError::NotFound { kind, id } = err {
            if !id.is_empty() {
                self.drop_entity(*kind, id);
            }
        }
    }

    fn drop_entity(&self, kind: EntityKind, id: &str) {
        if self.projection_mut().remove(kind, id).is_some() {
            info!(kind = %kind, id = %id, "Removed entity missing on server");
            self.emit(SyncEvent::EntityRemoved {
                kind,
                id: id.to_string(),
            });
        }
    }
}
