//! MusicStream Sync
//!
//! Client-side projection of the remote library and the pessimistic,
//! confirm-only synchronizer that keeps it converged with the server.
//!
//! # Architecture
//!
//! - **LocalProjection**: id-keyed tracks and playlists plus the favorite
//!   set, in last-known server order
//! - **Synchronizer**: validates an [`Intent`], dispatches it through a
//!   [`musicstream_core::RemoteStore`], and reconciles the projection with
//!   the answer
//! - **SyncEvent**: broadcast notifications for subscribers
//!
//! Nothing is applied optimistically. A failed intent leaves the projection
//! exactly as it was.
//!
//! # Example
//!
//! ```ignore
//! use musicstream_sync::Synchronizer;
//! use std::sync::Arc;
//!
//! let sync = Synchronizer::new(Arc::new(client));
//! sync.refresh().await?;
//!
//! let outcome = sync.create_playlist("Workout", None).await?;
//! for playlist in sync.projection().playlists() {
//!     println!("{} ({} tracks)", playlist.name, playlist.len());
//! }
//! ```

#![forbid(unsafe_code)]

pub mod events;
pub mod intent;
pub mod projection;
pub mod synchronizer;

pub use events::SyncEvent;
pub use intent::{Intent, Outcome};
pub use projection::LocalProjection;
pub use synchronizer::Synchronizer;
