//! Media element capability
//!
//! The session drives an external audio primitive through this trait.
//! Position updates and end-of-track flow back into the session as calls to
//! `PlaybackSession::on_position_update` and `PlaybackSession::on_ended`.

use crate::error::Result;
use std::time::Duration;

/// Platform audio element (HTML audio, native player, ...)
pub trait MediaElement: Send {
    /// Load a source; `uri` is the track's audio reference
    fn load(&mut self, uri: &str) -> Result<()>;

    fn play(&mut self) -> Result<()>;

    fn pause(&mut self) -> Result<()>;

    fn seek(&mut self, position: Duration) -> Result<()>;

    /// Volume in [0.0, 1.0]
    fn set_volume(&mut self, volume: f32) -> Result<()>;
}

impl<M: MediaElement + ?Sized> MediaElement for Box<M> {
    fn load(&mut self, uri: &str) -> Result<()> {
        (**self).load(uri)
    }

    fn play(&mut self) -> Result<()> {
        (**self).play()
    }

    fn pause(&mut self) -> Result<()> {
        (**self).pause()
    }

    fn seek(&mut self, position: Duration) -> Result<()> {
        (**self).seek(position)
    }

    fn set_volume(&mut self, volume: f32) -> Result<()> {
        (**self).set_volume(volume)
    }
}
