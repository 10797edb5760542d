//! Local Projection
//!
//! The client's in-memory belief of server state. It is never the source of
//! truth: every write comes from a gateway response (reconciliation or a full
//! refresh).
//!
//! Each collection keeps its last-known server order. Locally upserted ids
//! that were not seen before are appended; updates keep their slot.

use musicstream_core::{Entity, EntityKind, FavoriteSet, Playlist, PlaylistId, Track, TrackId};
use std::collections::{HashMap, HashSet};
use std::time::Duration;

/// Id-keyed collection with stable insertion order
#[derive(Debug, Clone, PartialEq, Eq)]
struct Collection<T> {
    order: Vec<String>,
    items: HashMap<String, T>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            order: Vec::new(),
            items: HashMap::new(),
        }
    }
}

impl<T> Collection<T> {
    fn get(&self, id: &str) -> Option<&T> {
        self.items.get(id)
    }

    fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Insert or overwrite. Returns true if the id was new.
    fn upsert(&mut self, id: String, item: T) -> bool {
        if self.items.insert(id.clone(), item).is_none() {
            self.order.push(id);
            true
        } else {
            false
        }
    }

    fn remove(&mut self, id: &str) -> Option<T> {
        let item = self.items.remove(id)?;
        self.order.retain(|existing| existing != id);
        Some(item)
    }

    fn replace(&mut self, items: impl IntoIterator<Item = (String, T)>) {
        self.order.clear();
        self.items.clear();
        for (id, item) in items {
            self.upsert(id, item);
        }
    }
}

/// Client-side mirror of tracks, playlists and the favorite set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalProjection {
    tracks: Collection<Track>,
    playlists: Collection<Playlist>,
    favorites: FavoriteSet,
    /// Playlists whose deletion the server confirmed
    tombstones: HashSet<PlaylistId>,
}

impl LocalProjection {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Kind-tagged access
    // =========================================================================

    /// Look up one entity. The favorite set is a singleton and ignores `id`.
    pub fn get(&self, kind: EntityKind, id: &str) -> Option<Entity> {
        match kind {
            EntityKind::Track => self.tracks.get(id).cloned().map(Entity::Track),
            EntityKind::Playlist => self.playlists.get(id).cloned().map(Entity::Playlist),
            EntityKind::FavoriteSet => Some(Entity::FavoriteSet(self.favorites.clone())),
        }
    }

    /// All entities of `kind` in last-known server order
    pub fn list(&self, kind: EntityKind) -> Vec<Entity> {
        match kind {
            EntityKind::Track => self.tracks.iter().cloned().map(Entity::Track).collect(),
            EntityKind::Playlist => self
                .playlists
                .iter()
                .cloned()
                .map(Entity::Playlist)
                .collect(),
            EntityKind::FavoriteSet => vec![Entity::FavoriteSet(self.favorites.clone())],
        }
    }

    /// Insert or overwrite an entity with its authoritative form.
    ///
    /// Playlists are de-duplicated on the way in. A tombstoned playlist is
    /// refused and `false` is returned.
    pub fn upsert(&mut self, entity: Entity) -> bool {
        match entity {
            Entity::Track(track) => {
                self.tracks.upsert(track.id.as_str().to_string(), track);
            }
            Entity::Playlist(mut playlist) => {
                if self.tombstones.contains(&playlist.id) {
                    return false;
                }
                playlist.dedup_tracks();
                self.playlists
                    .upsert(playlist.id.as_str().to_string(), playlist);
            }
            Entity::FavoriteSet(favorites) => self.favorites = favorites,
        }
        true
    }

    /// Remove an entity. Removing the favorite set empties it.
    pub fn remove(&mut self, kind: EntityKind, id: &str) -> Option<Entity> {
        match kind {
            EntityKind::Track => self.tracks.remove(id).map(Entity::Track),
            EntityKind::Playlist => self.playlists.remove(id).map(Entity::Playlist),
            EntityKind::FavoriteSet => Some(Entity::FavoriteSet(std::mem::take(
                &mut self.favorites,
            ))),
        }
    }

    /// Replace a whole collection with a fresh fetch.
    ///
    /// Replacing playlists drops the tombstone of every playlist the fetch
    /// contains. Tombstones for playlists still absent on the server stay, so
    /// a reconciliation still in flight cannot bring them back.
    pub fn replace_collection(&mut self, kind: EntityKind, entities: Vec<Entity>) {
        match kind {
            EntityKind::Track => self.tracks.replace(
                entities
                    .into_iter()
                    .filter_map(Entity::into_track)
                    .map(|track| (track.id.as_str().to_string(), track)),
            ),
            EntityKind::Playlist => {
                let playlists: Vec<Playlist> = entities
                    .into_iter()
                    .filter_map(Entity::into_playlist)
                    .collect();
                self.tombstones
                    .retain(|id| !playlists.iter().any(|playlist| &playlist.id == id));
                self.playlists
                    .replace(playlists.into_iter().map(|mut playlist| {
                        playlist.dedup_tracks();
                        (playlist.id.as_str().to_string(), playlist)
                    }));
            }
            EntityKind::FavoriteSet => {
                self.favorites = entities
                    .into_iter()
                    .find_map(Entity::into_favorites)
                    .unwrap_or_default();
            }
        }
    }

    /// Number of entities of `kind` (1 for the favorite set)
    pub fn count(&self, kind: EntityKind) -> usize {
        match kind {
            EntityKind::Track => self.tracks.len(),
            EntityKind::Playlist => self.playlists.len(),
            EntityKind::FavoriteSet => 1,
        }
    }

    // =========================================================================
    // Tombstones
    // =========================================================================

    /// Remove a playlist and remember that the server deleted it
    pub fn tombstone(&mut self, id: &PlaylistId) -> Option<Playlist> {
        self.tombstones.insert(id.clone());
        self.playlists.remove(id.as_str())
    }

    pub fn is_tombstoned(&self, id: &PlaylistId) -> bool {
        self.tombstones.contains(id)
    }

    // =========================================================================
    // Typed accessors
    // =========================================================================

    pub fn track(&self, id: &TrackId) -> Option<&Track> {
        self.tracks.get(id.as_str())
    }

    pub fn has_track(&self, id: &TrackId) -> bool {
        self.tracks.contains(id.as_str())
    }

    /// Catalog in last-known server order
    pub fn tracks(&self) -> Vec<&Track> {
        self.tracks.iter().collect()
    }

    pub fn playlist(&self, id: &PlaylistId) -> Option<&Playlist> {
        self.playlists.get(id.as_str())
    }

    pub fn playlists(&self) -> Vec<&Playlist> {
        self.playlists.iter().collect()
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, id: &TrackId) -> bool {
        self.favorites.contains(id)
    }

    /// Set favorite membership to an absolute value. Returns true on change.
    pub fn set_favorite(&mut self, id: &TrackId, favorited: bool) -> bool {
        self.favorites.set(id.clone(), favorited)
    }

    // =========================================================================
    // Materialisation
    // =========================================================================

    /// Tracks of a playlist in playlist order; dangling ids are skipped.
    pub fn playlist_tracks(&self, id: &PlaylistId) -> Option<Vec<&Track>> {
        let playlist = self.playlists.get(id.as_str())?;
        Some(
            playlist
                .track_ids
                .iter()
                .filter_map(|track_id| self.tracks.get(track_id.as_str()))
                .collect(),
        )
    }

    /// Favorited tracks in catalog order
    pub fn favorite_tracks(&self) -> Vec<&Track> {
        self.tracks
            .iter()
            .filter(|track| self.favorites.contains(&track.id))
            .collect()
    }

    /// Total length of the playlist's resolvable tracks
    pub fn playlist_duration(&self, id: &PlaylistId) -> Option<Duration> {
        self.playlist_tracks(id)
            .map(|tracks| tracks.iter().map(|track| track.duration()).sum())
    }

    /// Case-insensitive search over title, artist and genre.
    ///
    /// A blank query returns the whole catalog.
    pub fn search(&self, query: &str) -> Vec<&Track> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.tracks();
        }
        self.tracks
            .iter()
            .filter(|track| track.matches(&needle))
            .collect()
    }

    /// Distinct non-empty genres in catalog order
    pub fn genres(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.tracks
            .iter()
            .map(|track| track.genre.as_str())
            .filter(|genre| !genre.is_empty() && seen.insert(*genre))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use musicstream_core::UserId;

    fn track(id: &str, title: &str, genre: &str, secs: u32) -> Track {
        Track {
            id: TrackId::new(id),
            title: title.to_string(),
            artist: "Artist".to_string(),
            genre: genre.to_string(),
            duration_secs: secs,
            cover_url: String::new(),
            audio_url: format!("uploads/music/{}.mp3", id),
            uploaded_by: None,
            created_at: None,
        }
    }

    fn playlist(id: &str, tracks: &[&str]) -> Playlist {
        Playlist {
            id: PlaylistId::new(id),
            name: id.to_uppercase(),
            description: None,
            owner_id: UserId::new("u1"),
            cover_url: None,
            track_ids: tracks.iter().map(|t| TrackId::new(*t)).collect(),
        }
    }

    fn seeded() -> LocalProjection {
        let mut projection = LocalProjection::new();
        projection.replace_collection(
            EntityKind::Track,
            vec![
                Entity::Track(track("t1", "Bohemian Rhapsody", "Rock", 355)),
                Entity::Track(track("t2", "Imagine", "Pop", 183)),
                Entity::Track(track("t3", "Hotel California", "Rock", 391)),
            ],
        );
        projection
    }

    #[test]
    fn list_keeps_server_order_and_appends_new_ids() {
        let mut projection = seeded();
        projection.upsert(Entity::Track(track("t0", "New", "Jazz", 10)));
        projection.upsert(Entity::Track(track("t2", "Imagine (Remastered)", "Pop", 183)));

        let ids: Vec<_> = projection.tracks().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t1", "t2", "t3", "t0"]);
        assert_eq!(
            projection.track(&TrackId::new("t2")).unwrap().title,
            "Imagine (Remastered)"
        );
    }

    #[test]
    fn remove_and_get() {
        let mut projection = seeded();
        assert!(projection.get(EntityKind::Track, "t2").is_some());
        assert!(projection.remove(EntityKind::Track, "t2").is_some());
        assert!(projection.get(EntityKind::Track, "t2").is_none());
        assert!(projection.remove(EntityKind::Track, "t2").is_none());
        assert_eq!(projection.count(EntityKind::Track), 2);
    }

    #[test]
    fn upsert_deduplicates_playlists() {
        let mut projection = seeded();
        projection.upsert(Entity::Playlist(playlist("p1", &["t1", "t1", "t2"])));
        assert_eq!(projection.playlist(&PlaylistId::new("p1")).unwrap().len(), 2);
    }

    #[test]
    fn dangling_references_are_skipped() {
        let mut projection = seeded();
        projection.upsert(Entity::Playlist(playlist("p1", &["t3", "gone", "t1"])));

        let tracks = projection.playlist_tracks(&PlaylistId::new("p1")).unwrap();
        let ids: Vec<_> = tracks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["t3", "t1"]);

        assert_eq!(
            projection.playlist_duration(&PlaylistId::new("p1")),
            Some(Duration::from_secs(391 + 355))
        );
        assert!(projection.playlist_tracks(&PlaylistId::new("nope")).is_none());
    }

    #[test]
    fn favorite_tracks_follow_catalog_order() {
        let mut projection = seeded();
        projection.set_favorite(&TrackId::new("t3"), true);
        projection.set_favorite(&TrackId::new("t1"), true);
        projection.set_favorite(&TrackId::new("missing"), true);

        let ids: Vec<_> = projection
            .favorite_tracks()
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, vec!["t1", "t3"]);
    }

    #[test]
    fn search_is_case_insensitive() {
        let projection = seeded();
        assert_eq!(projection.search("ROCK").len(), 2);
        assert_eq!(projection.search("imag").len(), 1);
        assert_eq!(projection.search("   ").len(), 3);
        assert!(projection.search("polka").is_empty());
    }

    #[test]
    fn genres_are_distinct() {
        assert_eq!(seeded().genres(), vec!["Rock", "Pop"]);
    }

    #[test]
    fn tombstone_lifts_only_when_refresh_contains_playlist() {
        let mut projection = seeded();
        projection.upsert(Entity::Playlist(playlist("p1", &[])));

        assert!(projection.tombstone(&PlaylistId::new("p1")).is_some());
        assert!(!projection.upsert(Entity::Playlist(playlist("p1", &["t1"]))));
        assert!(projection.playlist(&PlaylistId::new("p1")).is_none());

        // A refresh without p1 keeps it buried
        projection.replace_collection(
            EntityKind::Playlist,
            vec![Entity::Playlist(playlist("p2", &[]))],
        );
        assert!(projection.is_tombstoned(&PlaylistId::new("p1")));
        assert!(!projection.upsert(Entity::Playlist(playlist("p1", &["t1"]))));

        projection.replace_collection(
            EntityKind::Playlist,
            vec![Entity::Playlist(playlist("p1", &["t1"]))],
        );
        assert!(!projection.is_tombstoned(&PlaylistId::new("p1")));
        assert!(projection.playlist(&PlaylistId::new("p1")).is_some());
    }

    #[test]
    fn favorite_set_is_a_singleton() {
        let mut projection = seeded();
        projection.replace_collection(
            EntityKind::FavoriteSet,
            vec![Entity::FavoriteSet(
                [TrackId::new("t1")].into_iter().collect(),
            )],
        );
        assert!(projection.is_favorite(&TrackId::new("t1")));
        assert_eq!(projection.list(EntityKind::FavoriteSet).len(), 1);

        projection.remove(EntityKind::FavoriteSet, "");
        assert!(projection.favorites().is_empty());
    }
}
