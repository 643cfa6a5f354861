//! The round loop: generate, print, play, pause.

use std::io::Write;
use std::time::Duration;

use tracing::{debug, info};

use crate::cadence_engine::SequenceGenerator;
use crate::error::Result;
use crate::playback::Playback;
use crate::stop::StopSignal;

/// How long a session runs and how it paces itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Pause after each round's cues have played.
    pub interval: Duration,
    /// Stop after this many rounds; `None` runs until the stop latch trips.
    pub max_rounds: Option<u64>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions { interval: Duration::from_secs(1), max_rounds: None }
    }
}

/// Run rounds until `stop` trips or `max_rounds` is reached.
///
/// Each round is written to `out` as one line, then every move's clip plays in
/// order. The latch is only consulted during the pause, so a round in progress
/// always finishes. Returns the number of rounds completed.
pub fn run_session<P, W>(
    generator: &mut SequenceGenerator,
    playback: &mut P,
    stop: &StopSignal,
    out: &mut W,
    options: &SessionOptions,
) -> Result<u64>
where
    P: Playback + ?Sized,
    W: Write + ?Sized,
{
    let mut completed = 0u64;

    loop {
        let round = generator.next_round()?;
        writeln!(out, "{round}")?;
        out.flush()?;

        for name in round.names() {
            playback.play_clip(name)?;
        }
        completed += 1;
        debug!(round = completed, "round played");

        if options.max_rounds.is_some_and(|max| completed >= max) {
            break;
        }
        if stop.wait(options.interval) {
            info!(rounds = completed, "stop requested");
            break;
        }
    }

    Ok(completed)
}
