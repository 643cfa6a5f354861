//! # combo_cadence
//!
//! A terminal training partner for striking sports. Each round it composes a
//! random combination of punches and kicks, prints it, calls every strike out
//! loud, then pauses before the next one.
//!
//! ## How it works
//!
//! 1. Build a [`CadenceConfig`]: round length, how many distinct moves to use,
//!    arm-only / leg-only, the pause between rounds, and an RNG seed.
//! 2. [`SequenceGenerator::new`] filters the move table into the working set
//!    once (short rounds drop kicks, `max_distinct` keeps the simplest moves)
//!    and checks that every slot a round can visit has a candidate.
//! 3. [`SequenceGenerator::next_round`] fills each slot through a rule chain:
//!    a per-move skip draw, the lead/rear side (flipping after every move),
//!    and, for mixed sets, arms inside the combo and a kick to finish rounds of
//!    four or more.
//! 4. [`run_session`] prints each [`Round`] and hands its moves to a
//!    [`Playback`] driver, one clip at a time, until a key is pressed.
//!
//! ## Key features
//!
//! - **Deterministic**: the seed defaults to `2`, so the same flags replay the
//!   same rounds; pass `rng_seed: None` for entropy.
//! - **Fail fast**: impossible configurations are rejected before the first
//!   round, and any clip failure ends the session.
//!
//! ## Quick start
//!
//! ```rust
//! use combo_cadence::{default_catalog, CadenceConfig, SequenceGenerator};
//!
//! let config = CadenceConfig { sequence_length: 4, ..CadenceConfig::default() };
//! let mut generator = SequenceGenerator::new(&default_catalog(), &config).unwrap();
//!
//! for _ in 0..3 {
//!     let round = generator.next_round().unwrap();
//!     println!("{round}"); // e.g. "L: jab direto cruza chuta"
//! }
//! ```

pub mod cadence_engine;
pub mod cli;
pub mod error;
pub mod playback;
pub mod session;
pub mod stop;

pub use cadence_engine::{
    default_catalog, load_catalog, parse_catalog, select_move, working_set, CadenceConfig,
    Limb, Move, Round, SequenceGenerator, Side, SlotContext, DEFAULT_SEED, MAX_SEQUENCE_LENGTH,
};
pub use error::{CatalogError, ConfigError, Error, PlaybackError, Result, SelectionError};
pub use playback::{ClipLibrary, Playback, SilentPlayback, SpeakerPlayback};
pub use session::{run_session, SessionOptions};
pub use stop::{spawn_key_listener, stop_latch, StopHandle, StopSignal};
