//! Local validation must reject intents before any remote call.

use async_trait::async_trait;
use mockall::mock;
use musicstream_core::{
    Entity, EntityKind, EntityPayload, FailureKind, FavoriteSet, Playlist, PlaylistId,
    RemoteStore, Result, StoreError, Track, TrackId, UserId,
};
use musicstream_sync::{LocalProjection, Outcome, Synchronizer};
use std::sync::Arc;

mock! {
    pub Store {}

    #[async_trait]
    impl RemoteStore for Store {
        async fn fetch_collection(&self, kind: EntityKind) -> Result<Vec<Entity>>;
        async fn create_entity(&self, kind: EntityKind, payload: EntityPayload) -> Result<Entity>;
        async fn update_entity(
            &self,
            kind: EntityKind,
            id: &str,
            payload: EntityPayload,
        ) -> Result<Entity>;
        async fn delete_entity(&self, kind: EntityKind, id: &str) -> Result<()>;
        async fn toggle_favorite(&self, track_id: &TrackId) -> Result<Option<FavoriteSet>>;
    }
}

fn silent_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_fetch_collection().never();
    store.expect_create_entity().never();
    store.expect_update_entity().never();
    store.expect_delete_entity().never();
    store.expect_toggle_favorite().never();
    store
}

fn playlist(id: &str, tracks: &[&str]) -> Playlist {
    Playlist {
        id: PlaylistId::new(id),
        name: "Chill".to_string(),
        description: None,
        owner_id: UserId::new("u1"),
        cover_url: None,
        track_ids: tracks.iter().map(|t| TrackId::new(*t)).collect(),
    }
}

fn projection() -> LocalProjection {
    let mut projection = LocalProjection::new();
    projection.replace_collection(
        EntityKind::Track,
        vec![Entity::Track(Track {
            id: TrackId::new("t1"),
            title: "Imagine".to_string(),
            artist: "John Lennon".to_string(),
            genre: "Pop".to_string(),
            duration_secs: 183,
            cover_url: String::new(),
            audio_url: "uploads/music/imagine.mp3".to_string(),
            uploaded_by: None,
            created_at: None,
        })],
    );
    projection.replace_collection(
        EntityKind::Playlist,
        vec![Entity::Playlist(playlist("p1", &["t1"]))],
    );
    projection
}

fn sync_with(store: MockStore) -> Synchronizer<MockStore> {
    Synchronizer::with_projection(Arc::new(store), projection())
}

fn assert_rejected(sync: &Synchronizer<MockStore>, outcome: Result<Outcome>) {
    let err = outcome.unwrap_err();
    assert_eq!(err.kind(), FailureKind::ValidationFailed, "{}", err);
    assert_eq!(sync.snapshot(), projection());
}

#[tokio::test]
async fn test_blank_playlist_name() {
    let sync = sync_with(silent_store());
    let outcome = sync.create_playlist("   ", None).await;
    assert_rejected(&sync, outcome);

    let outcome = sync.create_playlist("", None).await;
    assert_rejected(&sync, outcome);
}

#[tokio::test]
async fn test_unknown_playlist() {
    let sync = sync_with(silent_store());

    let outcome = sync
        .add_to_playlist(PlaylistId::new("nope"), TrackId::new("t1"))
        .await;
    assert_rejected(&sync, outcome);

    let outcome = sync
        .remove_from_playlist(PlaylistId::new("nope"), TrackId::new("t1"))
        .await;
    assert_rejected(&sync, outcome);

    let outcome = sync.delete_playlist(PlaylistId::new("nope")).await;
    assert_rejected(&sync, outcome);
}

#[tokio::test]
async fn test_unknown_track() {
    let sync = sync_with(silent_store());

    let outcome = sync
        .add_to_playlist(PlaylistId::new("p1"), TrackId::new("ghost"))
        .await;
    assert_rejected(&sync, outcome);

    let outcome = sync.toggle_favorite(TrackId::new("ghost")).await;
    assert_rejected(&sync, outcome);
}

#[tokio::test]
async fn test_duplicate_add_resolved_locally() {
    let sync = sync_with(silent_store());

    let outcome = sync
        .add_to_playlist(PlaylistId::new("p1"), TrackId::new("t1"))
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Unchanged);
}

#[tokio::test]
async fn test_valid_intent_reaches_store_once() {
    let mut store = MockStore::new();
    store
        .expect_create_entity()
        .times(1)
        .returning(|_, _| Ok(Entity::Playlist(playlist("p2", &[]))));

    let sync = sync_with(store);
    let outcome = sync.create_playlist("Focus", None).await.unwrap();

    assert!(matches!(outcome, Outcome::Upserted(_)));
    assert_eq!(sync.projection().playlists().len(), 2);
}

#[tokio::test]
async fn test_wrong_entity_kind_from_store_is_server_fault() {
    let mut store = MockStore::new();
    store
        .expect_create_entity()
        .times(1)
        .returning(|_, _| Ok(Entity::FavoriteSet(FavoriteSet::new())));

    let sync = sync_with(store);
    let before = sync.snapshot();
    let err = sync.create_playlist("Focus", None).await.unwrap_err();

    assert_eq!(err.kind(), FailureKind::ServerFault);
    assert_eq!(sync.snapshot(), before);
}

#[tokio::test]
async fn test_store_error_is_returned_unchanged() {
    let mut store = MockStore::new();
    store
        .expect_delete_entity()
        .times(1)
        .returning(|_, _| Err(StoreError::unauthorized("Not authenticated")));

    let sync = sync_with(store);
    let err = sync.delete_playlist(PlaylistId::new("p1")).await.unwrap_err();

    assert_eq!(err, StoreError::unauthorized("Not authenticated"));
    assert!(sync.projection().playlist(&PlaylistId::new("p1")).is_some());
}
