//! MusicStream Core
//!
//! Domain types, error taxonomy and the remote store seam shared by every
//! MusicStream crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `FavoriteSet` and their ids
//! - **Boundary Types**: `EntityKind`, `Entity`, `EntityPayload`
//! - **Remote Store**: the `RemoteStore` trait implemented by the HTTP client
//! - **Error Handling**: `StoreError` and its `FailureKind` tag
//!
//! # Example
//!
//! ```rust
//! use musicstream_core::{Entity, EntityKind, FavoriteSet, TrackId};
//!
//! let mut favorites = FavoriteSet::new();
//! favorites.set(TrackId::new("1"), true);
//!
//! let entity = Entity::FavoriteSet(favorites);
//! assert_eq!(entity.kind(), EntityKind::FavoriteSet);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod store;
pub mod types;

pub use error::{FailureKind, Result, StoreError};
pub use store::RemoteStore;
pub use types::{
    CreatePlaylist, Entity, EntityKind, EntityPayload, FavoriteSet, Playlist, PlaylistId,
    PlaylistUpdate, Track, TrackId, UserId,
};
