//! Error types for catalog loading, configuration, selection, and playback.

use std::path::PathBuf;

use crate::cadence_engine::models::{Limb, Side};

/// Problems with the run configuration, detected before the first round.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("sequence length must be at least 1")]
    ZeroSequenceLength,

    #[error("sequence length {length} is over the limit of {max}")]
    SequenceTooLong { length: usize, max: usize },

    #[error("no moves left after filtering (length {sequence_length}, distinct {max_distinct}, arm-only {arm_only}, leg-only {leg_only})")]
    EmptyWorkingSet {
        sequence_length: usize,
        max_distinct: usize,
        arm_only: bool,
        leg_only: bool,
    },

    #[error("no move can fill position {position} on the {side} side{}", limb_suffix(.limb))]
    UnsatisfiableSlot {
        position: usize,
        side: Side,
        limb: Option<Limb>,
    },
}

fn limb_suffix(limb: &Option<Limb>) -> String {
    match limb {
        Some(l) => format!(" with a {l} strike"),
        None => String::new(),
    }
}

/// Problems reading or validating a move table.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog contains no moves")]
    Empty,

    #[error("move '{0}' appears more than once")]
    DuplicateMove(String),

    #[error("move '{0}' has an empty name")]
    EmptyName(String),

    #[error("move '{name}' has skip probability {value}, expected a value in [0, 1]")]
    InvalidSkipProbability { name: String, value: f64 },

    #[error("move '{0}' is usable from neither side")]
    NoSide(String),
}

/// The rule chain left nothing to pick from.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("every candidate was filtered out at position {position} on the {side} side")]
    NoEligibleMove { position: usize, side: Side },
}

/// Failures while loading or playing a clip. All of them end the session.
#[derive(Debug, thiserror::Error)]
pub enum PlaybackError {
    #[error("no clip for move '{name}' at {}", .path.display())]
    MissingClip { name: String, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error in '{name}': {source}")]
    Decode {
        name: String,
        #[source]
        source: symphonia::core::errors::Error,
    },

    #[error("'{0}' has no decodable audio track")]
    NoTrack(String),

    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("audio device error: {0}")]
    Device(String),

    #[error("audio stream error: {0}")]
    Stream(String),
}

/// Top-level error for anything the session can fail with.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error(transparent)]
    Playback(#[from] PlaybackError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
