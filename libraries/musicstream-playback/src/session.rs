//! Playback session - current track and transport state
//!
//! States: `Empty` → (`select_track`) → `Playing` ⇄ (`toggle_play`) `Paused`.
//! `stop` returns to `Empty`. Position is clamped to [0, duration] on every
//! mutation.

use crate::error::{PlaybackError, Result};
use crate::events::PlaybackEvent;
use crate::media::MediaElement;
use crate::types::{Direction, NowPlaying, SessionState, DEFAULT_VOLUME};
use musicstream_core::Track;
use std::collections::VecDeque;
use std::time::Duration;
use tracing::{debug, info};

/// Drives a [`MediaElement`] for one listener
pub struct PlaybackSession<M: MediaElement> {
    media: M,
    current: Option<NowPlaying>,
    state: SessionState,
    position: Duration,
    volume: f32,
    /// Level to restore on unmute
    muted_from: Option<f32>,
    events: VecDeque<PlaybackEvent>,
}

impl<M: MediaElement> PlaybackSession<M> {
    /// New empty session at the default volume
    pub fn new(media: M) -> Self {
        Self {
            media,
            current: None,
            state: SessionState::Empty,
            position: Duration::ZERO,
            volume: DEFAULT_VOLUME,
            muted_from: None,
            events: VecDeque::new(),
        }
    }

    // ===== Accessors =====

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn current(&self) -> Option<&NowPlaying> {
        self.current.as_ref()
    }

    pub fn position(&self) -> Duration {
        self.position
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted_from.is_some()
    }

    pub fn media(&self) -> &M {
        &self.media
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        self.events.drain(..).collect()
    }

    // ===== Transport =====

    /// Load and play `track`, or toggle play/pause if it is already loaded
    pub fn select_track(&mut self, track: &Track) -> Result<()> {
        let same = self
            .current
            .as_ref()
            .is_some_and(|now| now.track_id == track.id);

        if same {
            self.toggle_play()
        } else {
            self.load_and_play(track)
        }
    }

    /// Switch between playing and paused. No-op when nothing is loaded.
    pub fn toggle_play(&mut self) -> Result<()> {
        match self.state {
            SessionState::Empty => Ok(()),
            SessionState::Playing => {
                self.media.pause()?;
                self.set_state(SessionState::Paused);
                Ok(())
            }
            SessionState::Paused => {
                self.media.play()?;
                self.set_state(SessionState::Playing);
                Ok(())
            }
        }
    }

    /// Move to the neighbouring track in `tracks`, wrapping at both ends,
    /// and hand it to [`Self::select_track`]. Landing on the current track
    /// (a single-track list) therefore toggles play/pause.
    ///
    /// No-op when `tracks` is empty or nothing is loaded. If the current
    /// track is not in `tracks`, `Next` goes to the first and `Previous` to
    /// the last.
    pub fn advance(&mut self, direction: Direction, tracks: &[Track]) -> Result<()> {
        let Some(current) = &self.current else {
            return Ok(());
        };
        if tracks.is_empty() {
            return Ok(());
        }

        let n = tracks.len();
        let index = match tracks.iter().position(|t| t.id == current.track_id) {
            Some(i) => match direction {
                Direction::Next => (i + 1) % n,
                Direction::Previous => (i + n - 1) % n,
            },
            None => match direction {
                Direction::Next => 0,
                Direction::Previous => n - 1,
            },
        };

        debug!(direction = ?direction, index, "Advancing");
        self.select_track(&tracks[index])
    }

    /// Jump to `position`, clamped to the track length
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let duration = self
            .current
            .as_ref()
            .map(|now| now.duration)
            .ok_or(PlaybackError::NoTrackLoaded)?;

        let position = position.min(duration);
        self.media.seek(position)?;
        self.set_position(position);
        Ok(())
    }

    /// Unload the current track
    pub fn stop(&mut self) -> Result<()> {
        if self.current.is_none() {
            return Ok(());
        }
        if self.state == SessionState::Playing {
            self.media.pause()?;
        }

        self.current = None;
        self.position = Duration::ZERO;
        self.set_state(SessionState::Empty);
        info!("Playback stopped");
        Ok(())
    }

    // ===== Media callbacks =====

    /// Position reported by the media element. Ignored when nothing is loaded.
    pub fn on_position_update(&mut self, position: Duration) {
        if let Some(now) = &self.current {
            let position = position.min(now.duration);
            self.set_position(position);
        }
    }

    /// The media element reached the end of the track
    pub fn on_ended(&mut self, tracks: &[Track]) -> Result<()> {
        let Some(now) = &self.current else {
            return Ok(());
        };

        self.events.push_back(PlaybackEvent::TrackFinished {
            track_id: now.track_id.clone(),
        });
        self.advance(Direction::Next, tracks)
    }

    // ===== Volume =====

    /// Set volume, clamped to [0.0, 1.0]. Clears mute.
    pub fn set_volume(&mut self, volume: f32) -> Result<()> {
        let volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };

        self.media.set_volume(volume)?;
        self.volume = volume;
        self.muted_from = None;
        self.emit_volume();
        Ok(())
    }

    pub fn mute(&mut self) -> Result<()> {
        if self.muted_from.is_some() {
            return Ok(());
        }
        self.media.set_volume(0.0)?;
        self.muted_from = Some(self.volume);
        self.volume = 0.0;
        self.emit_volume();
        Ok(())
    }

    /// Restore the level saved by `mute`
    pub fn unmute(&mut self) -> Result<()> {
        let Some(level) = self.muted_from else {
            return Ok(());
        };
        self.media.set_volume(level)?;
        self.volume = level;
        self.muted_from = None;
        self.emit_volume();
        Ok(())
    }

    // ===== Internal =====

    fn load_and_play(&mut self, track: &Track) -> Result<()> {
        self.media.load(&track.audio_url)?;

        let now = NowPlaying::from(track);
        let previous_track_id = self.current.take().map(|prev| prev.track_id);
        info!(track_id = %now.track_id, title = %now.title, "Loaded track");

        self.events.push_back(PlaybackEvent::TrackChanged {
            track_id: now.track_id.clone(),
            previous_track_id,
        });
        self.current = Some(now);
        self.set_position(Duration::ZERO);

        if let Err(e) = self.media.play() {
            self.set_state(SessionState::Paused);
            return Err(e);
        }
        self.set_state(SessionState::Playing);
        Ok(())
    }

    fn set_state(&mut self, state: SessionState) {
        if self.state != state {
            self.state = state;
            self.events.push_back(PlaybackEvent::StateChanged { state });
        }
    }

    fn set_position(&mut self, position: Duration) {
        self.position = position;
        self.events
            .push_back(PlaybackEvent::PositionChanged { position });
    }

    fn emit_volume(&mut self) {
        self.events.push_back(PlaybackEvent::VolumeChanged {
            volume: self.volume,
            muted: self.is_muted(),
        });
    }
}
