//! MusicStream Playback
//!
//! Platform-agnostic playback session: which track is loaded, whether it is
//! playing, where it is, how loud, and which track comes next.
//!
//! Audio output is not handled here. The session drives a [`MediaElement`]
//! supplied by the platform and is fed position/end-of-track callbacks from
//! it.
//!
//! # Example
//!
//! ```rust,ignore
//! use musicstream_playback::{Direction, PlaybackSession};
//!
//! let mut session = PlaybackSession::new(media);
//! session.select_track(&tracks[1])?;
//! session.advance(Direction::Next, &tracks)?;
//!
//! for event in session.drain_events() {
//!     println!("{:?}", event);
//! }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod events;
pub mod media;
pub mod session;
pub mod types;

pub use error::{PlaybackError, Result};
pub use events::PlaybackEvent;
pub use media::MediaElement;
pub use session::PlaybackSession;
pub use types::{format_time, Direction, NowPlaying, SessionState, DEFAULT_VOLUME};
