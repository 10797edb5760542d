//! Command-line arguments

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "musicstream")]
#[command(about = "Browse and edit a MusicStream library", long_about = None, version)]
pub struct Cli {
    /// Configuration file path (defaults to ./musicstream.toml if present)
    #[arg(short, long, env = "MUSICSTREAM_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Check that the API is reachable
    Ping,
    /// List the catalog
    Tracks,
    /// Filter the catalog by title, artist or genre
    Search {
        query: String,
    },
    /// List playlists with track count and total length
    Playlists,
    /// Show one playlist's tracks
    Playlist {
        id: String,
    },
    /// List favorite tracks
    Favorites,
    /// Toggle a track's favorite status
    Favorite {
        track_id: String,
    },
    /// Create an empty playlist
    CreatePlaylist {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Add a track to a playlist
    AddTrack {
        playlist_id: String,
        track_id: String,
    },
    /// Remove a track from a playlist
    RemoveTrack {
        playlist_id: String,
        track_id: String,
    },
    /// Delete a playlist
    DeletePlaylist {
        playlist_id: String,
    },
    /// Load a track into a preview session and show what plays next
    Play {
        track_id: String,
    },
}
