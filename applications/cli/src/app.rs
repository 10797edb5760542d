//! Command execution
//!
//! Each command refreshes only the collections it reads, goes through the
//! synchronizer for mutations, and renders plain text.

use crate::cli::Command;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::media::PreviewMedia;
use musicstream_client::MusicStreamClient;
use musicstream_core::{Entity, EntityKind, Playlist, PlaylistId, Track, TrackId};
use musicstream_playback::{format_time, Direction, PlaybackSession};
use musicstream_sync::{Outcome, Synchronizer};
use std::sync::Arc;
use tracing::{debug, info};

pub struct App {
    client: Arc<MusicStreamClient>,
    sync: Synchronizer<MusicStreamClient>,
    volume: f32,
}

impl App {
    pub fn new(config: &CliConfig) -> Result<Self> {
        let client = Arc::new(MusicStreamClient::new(config.client_config())?);
        info!(url = %client.url(), "Using MusicStream API");

        Ok(Self {
            sync: Synchronizer::new(Arc::clone(&client)),
            client,
            volume: config.playback.volume,
        })
    }

    pub fn synchronizer(&self) -> &Synchronizer<MusicStreamClient> {
        &self.sync
    }

    /// Run one command and return its output
    pub async fn run(&self, command: Command) -> Result<String> {
        debug!(command = ?command, "Running command");

        match command {
            Command::Ping => {
                let health = self.client.ping().await?;
                Ok(format!("{} ({})", health.message, health.status))
            }
            Command::Tracks => {
                self.refresh(&[EntityKind::Track]).await?;
                let projection = self.sync.projection();
                Ok(render_tracks(&projection.tracks(), "No tracks in the catalog"))
            }
            Command::Search { query } => {
                self.refresh(&[EntityKind::Track]).await?;
                let projection = self.sync.projection();
                let results = projection.search(&query);
                let mut lines = vec![format!(
                    "{} result(s) for {:?}",
                    results.len(),
                    query.trim()
                )];
                lines.extend(results.iter().map(|track| format_track(track)));
                Ok(lines.join("\n"))
            }
            Command::Playlists => {
                self.refresh(&[EntityKind::Track, EntityKind::Playlist])
                    .await?;
                let projection = self.sync.projection();
                let playlists = projection.playlists();
                if playlists.is_empty() {
                    return Ok("No playlists".to_string());
                }
                Ok(playlists
                    .iter()
                    .map(|playlist| {
                        let duration = projection
                            .playlist_duration(&playlist.id)
                            .unwrap_or_default();
                        format_playlist(playlist, &format_time(duration))
                    })
                    .collect::<Vec<_>>()
                    .join("\n"))
            }
            Command::Playlist { id } => {
                self.refresh(&[EntityKind::Track, EntityKind::Playlist])
                    .await?;
                let id = PlaylistId::new(id);
                let projection = self.sync.projection();
                let playlist = projection
                    .playlist(&id)
                    .ok_or_else(|| CliError::NotFound(format!("playlist {}", id)))?;
                let tracks = projection.playlist_tracks(&id).unwrap_or_default();
                let duration = projection.playlist_duration(&id).unwrap_or_default();

                let mut lines = vec![format_playlist(playlist, &format_time(duration))];
                if let Some(description) = &playlist.description {
                    lines.push(format!("  {}", description));
                }
                if tracks.is_empty() {
                    lines.push("  (empty)".to_string());
                }
                lines.extend(
                    tracks
                        .iter()
                        .enumerate()
                        .map(|(i, track)| format!("  {:>2}. {}", i + 1, format_track(track))),
                );
                Ok(lines.join("\n"))
            }
            Command::Favorites => {
                self.refresh(&[EntityKind::Track, EntityKind::FavoriteSet])
                    .await?;
                let projection = self.sync.projection();
                Ok(render_tracks(&projection.favorite_tracks(), "No favorites yet"))
            }
            Command::Favorite { track_id } => {
                self.refresh(&[EntityKind::Track, EntityKind::FavoriteSet])
                    .await?;
                let outcome = self.sync.toggle_favorite(TrackId::new(track_id)).await?;
                Ok(describe(&outcome))
            }
            Command::CreatePlaylist { name, description } => {
                let outcome = self.sync.create_playlist(name, description).await?;
                Ok(describe(&outcome))
            }
            Command::AddTrack {
                playlist_id,
                track_id,
            } => {
                self.refresh(&[EntityKind::Track, EntityKind::Playlist])
                    .await?;
                let outcome = self
                    .sync
                    .add_to_playlist(PlaylistId::new(playlist_id), TrackId::new(track_id))
                    .await?;
                Ok(match outcome {
                    Outcome::Unchanged => "Track is already in the playlist".to_string(),
                    other => describe(&other),
                })
            }
            Command::RemoveTrack {
                playlist_id,
                track_id,
            } => {
                self.refresh(&[EntityKind::Playlist]).await?;
                let outcome = self
                    .sync
                    .remove_from_playlist(PlaylistId::new(playlist_id), TrackId::new(track_id))
                    .await?;
                Ok(match outcome {
                    Outcome::Unchanged => "Track is not in the playlist".to_string(),
                    other => describe(&other),
                })
            }
            Command::DeletePlaylist { playlist_id } => {
                self.refresh(&[EntityKind::Playlist]).await?;
                let outcome = self
                    .sync
                    .delete_playlist(PlaylistId::new(playlist_id))
                    .await?;
                Ok(describe(&outcome))
            }
            Command::Play { track_id } => {
                self.refresh(&[EntityKind::Track]).await?;
                self.preview(&TrackId::new(track_id))
            }
        }
    }

    async fn refresh(&self, kinds: &[EntityKind]) -> Result<()> {
        for kind in kinds {
            self.sync.refresh_kind(*kind).await?;
        }
        Ok(())
    }

    /// Load a track into a preview session and peek at the next one
    fn preview(&self, track_id: &TrackId) -> Result<String> {
        let tracks: Vec<Track> = self
            .sync
            .projection()
            .tracks()
            .into_iter()
            .cloned()
            .collect();
        let track = tracks
            .iter()
            .find(|track| &track.id == track_id)
            .ok_or_else(|| CliError::NotFound(format!("track {}", track_id)))?;

        let mut session = PlaybackSession::new(PreviewMedia::new(Arc::clone(&self.client)));
        session.set_volume(self.volume)?;
        session.select_track(track)?;

        let mut lines = vec![
            format!(
                "Now playing: {} - {} ({})",
                track.title,
                track.artist,
                format_time(track.duration())
            ),
            format!("  source: {}", session.media().source().unwrap_or_default()),
            format!("  volume: {:.0}%", session.volume() * 100.0),
        ];

        session.advance(Direction::Next, &tracks)?;
        if let Some(next) = session.current() {
            lines.push(format!("Up next: {} - {}", next.title, next.artist));
        }

        Ok(lines.join("\n"))
    }
}

fn format_track(track: &Track) -> String {
    let genre = if track.genre.is_empty() {
        String::new()
    } else {
        format!(" [{}]", track.genre)
    };
    format!(
        "{:<24} {} - {}{} {}",
        track.id.as_str(),
        track.title,
        track.artist,
        genre,
        format_time(track.duration())
    )
}

fn format_playlist(playlist: &Playlist, duration: &str) -> String {
    format!(
        "{:<24} {} ({} tracks, {})",
        playlist.id.as_str(),
        playlist.name,
        playlist.len(),
        duration
    )
}

fn render_tracks(tracks: &[&Track], empty: &str) -> String {
    if tracks.is_empty() {
        return empty.to_string();
    }
    tracks
        .iter()
        .map(|track| format_track(track))
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Upserted(Entity::Playlist(playlist)) => format!(
            "Saved playlist {} ({}, {} tracks)",
            playlist.name,
            playlist.id.as_str(),
            playlist.len()
        ),
        Outcome::Upserted(entity) => format!("Saved {}", entity.kind()),
        Outcome::Removed { kind, id } => format!("Deleted {} {}", kind, id),
        Outcome::Favorite {
            track_id,
            favorited: true,
        } => format!("Added {} to favorites", track_id),
        Outcome::Favorite {
            track_id,
            favorited: false,
        } => format!("Removed {} from favorites", track_id),
        Outcome::Unchanged => "Nothing to change".to_string(),
    }
}
