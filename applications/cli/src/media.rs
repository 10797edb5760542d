//! Preview media element
//!
//! The terminal has no audio output, so this element only resolves the
//! source URL and records what a real player would have been told to do.

use musicstream_client::MusicStreamClient;
use musicstream_playback::{MediaElement, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

pub struct PreviewMedia {
    client: Arc<MusicStreamClient>,
    source: Option<String>,
    playing: bool,
    volume: f32,
}

impl PreviewMedia {
    pub fn new(client: Arc<MusicStreamClient>) -> Self {
        Self {
            client,
            source: None,
            playing: false,
            volume: 1.0,
        }
    }

    /// Absolute URL of the loaded source
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }
}

impl MediaElement for PreviewMedia {
    fn load(&mut self, uri: &str) -> Result<()> {
        let url = self.client.media_url(uri);
        debug!(url = %url, "Loading source");
        self.source = Some(url);
        self.playing = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.playing = false;
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        debug!(position = ?position, "Seek");
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        self.volume = volume;
        Ok(())
    }
}
