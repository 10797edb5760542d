//! In-memory remote store for synchronizer tests.
//!
//! Mutations are applied to the fake server state as soon as the call
//! arrives; a held gate then delays only the *response*, which lets tests
//! control completion order.

use async_trait::async_trait;
use musicstream_core::{
    Entity, EntityKind, EntityPayload, FavoriteSet, Playlist, PlaylistId, PlaylistUpdate,
    RemoteStore, Result, StoreError, Track, TrackId, UserId,
};
use musicstream_sync::Synchronizer;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
struct ServerState {
    tracks: Vec<Track>,
    playlists: Vec<Playlist>,
    favorites: FavoriteSet,
    next_id: usize,
}

#[derive(Default)]
pub struct FakeStore {
    state: Mutex<ServerState>,
    failures: Mutex<VecDeque<StoreError>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    calls: AtomicUsize,
    toggle_returns_set: AtomicBool,
}

impl FakeStore {
    pub fn new(tracks: Vec<Track>, playlists: Vec<Playlist>) -> Self {
        let store = Self::default();
        {
            let mut state = store.state.lock().unwrap();
            state.tracks = tracks;
            state.playlists = playlists;
        }
        store
    }

    /// Fail the next remote call with `error` without touching server state
    pub fn fail_next(&self, error: StoreError) {
        self.failures.lock().unwrap().push_back(error);
    }

    /// Delay the response of the call identified by `key` until the returned
    /// gate is notified.
    ///
    /// Keys: `create`, `update:{playlist}:{track}`, `delete:{playlist}`,
    /// `toggle:{track}`.
    pub fn hold(&self, key: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(key.to_string(), gate.clone());
        gate
    }

    /// Make `toggle_favorite` answer with the updated set instead of nothing
    pub fn toggle_returns_set(&self, enabled: bool) {
        self.toggle_returns_set.store(enabled, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn server_playlist(&self, id: &str) -> Option<Playlist> {
        let state = self.state.lock().unwrap();
        state
            .playlists
            .iter()
            .find(|p| p.id.as_str() == id)
            .cloned()
    }

    pub fn server_favorites(&self) -> FavoriteSet {
        self.state.lock().unwrap().favorites.clone()
    }

    /// Remove a playlist behind the client's back
    pub fn delete_on_server(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .playlists
            .retain(|p| p.id.as_str() != id);
    }

    /// Remove a track behind the client's back
    pub fn delete_track_on_server(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .tracks
            .retain(|t| t.id.as_str() != id);
    }

    fn begin(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn gate(&self, key: String) {
        let gate = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn fetch_collection(&self, kind: EntityKind) -> Result<Vec<Entity>> {
        self.begin()?;
        let state = self.state.lock().unwrap();
        Ok(match kind {
            EntityKind::Track => state.tracks.iter().cloned().map(Entity::Track).collect(),
            EntityKind::Playlist => state
                .playlists
                .iter()
                .cloned()
                .map(Entity::Playlist)
                .collect(),
            EntityKind::FavoriteSet => vec![Entity::FavoriteSet(state.favorites.clone())],
        })
    }

    async fn create_entity(&self, kind: EntityKind, payload: EntityPayload) -> Result<Entity> {
        self.begin()?;
        let EntityPayload::CreatePlaylist(create) = payload else {
            return Err(StoreError::validation(format!("cannot create {}", kind)));
        };

        let playlist = {
            let mut state = self.state.lock().unwrap();
            state.next_id += 1;
            let playlist = Playlist {
                id: PlaylistId::new(format!("srv-{}", state.next_id)),
                name: create.name,
                description: create.description,
                owner_id: UserId::new("u1"),
                cover_url: None,
                track_ids: Vec::new(),
            };
            state.playlists.push(playlist.clone());
            playlist
        };

        self.gate("create".to_string()).await;
        Ok(Entity::Playlist(playlist))
    }

    async fn update_entity(
        &self,
        kind: EntityKind,
        id: &str,
        payload: EntityPayload,
    ) -> Result<Entity> {
        self.begin()?;
        let EntityPayload::UpdatePlaylist(update) = payload else {
            return Err(StoreError::validation(format!("cannot update {}", kind)));
        };

        let (playlist, key) = {
            let mut state = self.state.lock().unwrap();
            if let PlaylistUpdate::AddTrack { track_id } = &update {
                let playlist_exists = state.playlists.iter().any(|p| p.id.as_str() == id);
                if playlist_exists && !state.tracks.iter().any(|t| &t.id == track_id) {
                    return Err(StoreError::not_found(EntityKind::Track, track_id.as_str()));
                }
            }
            let playlist = state
                .playlists
                .iter_mut()
                .find(|p| p.id.as_str() == id)
                .ok_or_else(|| StoreError::not_found(EntityKind::Playlist, id))?;

            let key = match &update {
                PlaylistUpdate::AddTrack { track_id } => {
                    if !playlist.contains(track_id) {
                        playlist.track_ids.push(track_id.clone());
                    }
                    format!("update:{}:{}", id, track_id)
                }
                PlaylistUpdate::RemoveTrack { track_id } => {
                    playlist.track_ids.retain(|t| t != track_id);
                    format!("update:{}:{}", id, track_id)
                }
                PlaylistUpdate::Rename { name, description } => {
                    playlist.name = name.clone();
                    playlist.description = description.clone();
                    format!("update:{}:rename", id)
                }
            };
            (playlist.clone(), key)
        };

        self.gate(key).await;
        Ok(Entity::Playlist(playlist))
    }

    async fn delete_entity(&self, kind: EntityKind, id: &str) -> Result<()> {
        self.begin()?;
        {
            let mut state = self.state.lock().unwrap();
            let before = state.playlists.len();
            state.playlists.retain(|p| p.id.as_str() != id);
            if state.playlists.len() == before {
                return Err(StoreError::not_found(kind, id));
            }
        }

        self.gate(format!("delete:{}", id)).await;
        Ok(())
    }

    async fn toggle_favorite(&self, track_id: &TrackId) -> Result<Option<FavoriteSet>> {
        self.begin()?;
        let favorites = {
            let mut state = self.state.lock().unwrap();
            if !state.tracks.iter().any(|t| &t.id == track_id) {
                return Err(StoreError::not_found(EntityKind::Track, track_id.as_str()));
            }
            let favorited = !state.favorites.contains(track_id);
            state.favorites.set(track_id.clone(), favorited);
            state.favorites.clone()
        };

        self.gate(format!("toggle:{}", track_id)).await;
        if self.toggle_returns_set.load(Ordering::SeqCst) {
            Ok(Some(favorites))
        } else {
            Ok(None)
        }
    }
}

pub fn track(id: &str, title: &str, genre: &str, secs: u32) -> Track {
    Track {
        id: TrackId::new(id),
        title: title.to_string(),
        artist: "Various".to_string(),
        genre: genre.to_string(),
        duration_secs: secs,
        cover_url: String::new(),
        audio_url: format!("uploads/music/{}.mp3", id),
        uploaded_by: None,
        created_at: None,
    }
}

pub fn playlist(id: &str, name: &str, tracks: &[&str]) -> Playlist {
    Playlist {
        id: PlaylistId::new(id),
        name: name.to_string(),
        description: None,
        owner_id: UserId::new("u1"),
        cover_url: None,
        track_ids: tracks.iter().map(|t| TrackId::new(*t)).collect(),
    }
}

/// Store with four tracks and one playlist `p1` = [T1, T2]
pub fn seeded_store() -> Arc<FakeStore> {
    Arc::new(FakeStore::new(
        vec![
            track("T1", "Bohemian Rhapsody", "Rock", 355),
            track("T2", "Imagine", "Pop", 183),
            track("T3", "Hotel California", "Rock", 391),
            track("T4", "Billie Jean", "Pop", 294),
        ],
        vec![playlist("p1", "Favorites Mix", &["T1", "T2"])],
    ))
}

/// Synchronizer over `store` with the projection already refreshed
pub async fn synced(store: Arc<FakeStore>) -> Synchronizer<FakeStore> {
    let sync = Synchronizer::new(store);
    sync.refresh().await.unwrap();
    sync
}
