//! Audio cues for generated moves.
//!
//! | Module    | Purpose |
//! |-----------|---------|
//! | `clip`    | symphonia decoding, device-layout rendering, per-name cache |
//! | `speaker` | cpal output that blocks until a clip has finished |

pub mod clip;
pub mod speaker;

use tracing::debug;

use crate::error::PlaybackError;

pub use clip::{decode_clip, Clip, ClipLibrary, CLIP_EXTENSION};
pub use speaker::{Speaker, SpeakerPlayback};

/// Plays the cue for one move.
///
/// Implementations return only once the clip has finished, so a round's cues
/// never overlap. Any error ends the session.
pub trait Playback {
    fn play_clip(&mut self, name: &str) -> Result<(), PlaybackError>;
}

/// Playback that only logs; used with `--mute`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentPlayback;

impl Playback for SilentPlayback {
    fn play_clip(&mut self, name: &str) -> Result<(), PlaybackError> {
        debug!(clip = name, "muted");
        Ok(())
    }
}

impl<P: Playback + ?Sized> Playback for Box<P> {
    fn play_clip(&mut self, name: &str) -> Result<(), PlaybackError> {
        (**self).play_clip(name)
    }
}
