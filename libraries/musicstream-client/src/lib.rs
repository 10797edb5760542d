//! MusicStream API Client
//!
//! HTTP implementation of [`musicstream_core::RemoteStore`] for the
//! MusicStream backend.
//!
//! # Features
//!
//! - **Collections**: fetch tracks, playlists and the favorite set
//! - **Playlists**: create, add/remove track, delete, and rename (not used by
//!   the synchronizer)
//! - **Favorites**: toggle membership of a track
//! - **Media**: resolve relative audio/cover references against the backend
//!
//! Status codes are mapped onto the `StoreError` taxonomy; nothing is retried.
//!
//! # Example
//!
//! ```ignore
//! use musicstream_client::{ClientConfig, MusicStreamClient};
//! use musicstream_core::{EntityKind, RemoteStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::with_token("https://music.example.com", "token");
//!     let client = MusicStreamClient::new(config)?;
//!
//!     let playlists = client.fetch_collection(EntityKind::Playlist).await?;
//!     println!("Found {} playlists", playlists.len());
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod store;
mod types;

pub use client::MusicStreamClient;
pub use error::{ClientError, Result};
pub use types::{ClientConfig, HealthStatus};
