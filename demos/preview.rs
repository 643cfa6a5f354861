//! Preview of the rounds different settings produce, without audio.
//!
//! Run with: `cargo run --example preview`
//!
//! Each block runs a short muted session with a fixed seed, so the output is
//! the same on every run:
//!
//! - **Short rounds** (2-3 moves) drop every kick from the move table.
//! - **Long rounds** (4+) punch first and always finish with a kick.
//! - **Single moves** can be anything, and the side flips every round.
//! - **`max_distinct`** keeps only the simplest moves, for beginners.

use std::io;
use std::time::Duration;

use combo_cadence::{
    default_catalog, run_session, CadenceConfig, SequenceGenerator, SessionOptions,
    SilentPlayback, StopSignal,
};

fn preview(title: &str, config: CadenceConfig) -> combo_cadence::Result<()> {
    println!("━━ {title} ━━");
    let mut generator = SequenceGenerator::new(&default_catalog(), &config)?;
    let names: Vec<&str> = generator.working_set().iter().map(|m| m.name.as_str()).collect();
    println!("   moves: {}", names.join(", "));

    let options = SessionOptions { interval: Duration::ZERO, max_rounds: Some(5) };
    {
        let mut out = io::stdout().lock();
        run_session(&mut generator, &mut SilentPlayback, &StopSignal::never(), &mut out, &options)?;
    }
    println!();
    Ok(())
}

fn main() -> combo_cadence::Result<()> {
    preview("Pairs", CadenceConfig::new(2))?;
    preview("Triples", CadenceConfig::new(3))?;
    preview("Four with a kick", CadenceConfig::new(4))?;
    preview("Single strikes", CadenceConfig::new(1))?;
    preview("Legs only", CadenceConfig { leg_only: true, ..CadenceConfig::new(3) })?;
    preview("Beginner: three moves", CadenceConfig { max_distinct: 3, ..CadenceConfig::new(2) })?;
    preview("Another seed", CadenceConfig { rng_seed: Some(7), ..CadenceConfig::new(5) })?;
    Ok(())
}
