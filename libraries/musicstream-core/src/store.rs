//! Remote store trait
//!
//! The authoritative copy of every collection lives behind this trait. The
//! HTTP implementation is in `musicstream-client`; tests plug in in-memory
//! fakes.

use crate::error::Result;
use crate::types::{Entity, EntityKind, EntityPayload, FavoriteSet, TrackId};
use async_trait::async_trait;

/// Stateless request/response boundary to the remote document store
///
/// Implementations must not retry; retry policy belongs to the caller.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch every entity of `kind` in server order
    async fn fetch_collection(&self, kind: EntityKind) -> Result<Vec<Entity>>;

    /// Create an entity and return its canonical form
    async fn create_entity(&self, kind: EntityKind, payload: EntityPayload) -> Result<Entity>;

    /// Apply `payload` to entity `id` and return its canonical form
    async fn update_entity(
        &self,
        kind: EntityKind,
        id: &str,
        payload: EntityPayload,
    ) -> Result<Entity>;

    /// Delete entity `id`
    async fn delete_entity(&self, kind: EntityKind, id: &str) -> Result<()>;

    /// Flip favorite membership of a track.
    ///
    /// Returns the updated set when the server sends one back.
    async fn toggle_favorite(&self, track_id: &TrackId) -> Result<Option<FavoriteSet>>;
}
