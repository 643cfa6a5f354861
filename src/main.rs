//! cadence: calls out random strike combinations until a key is pressed.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use combo_cadence::cli::{report_failure, Args};
use combo_cadence::playback::{ClipLibrary, Playback, SilentPlayback, Speaker, SpeakerPlayback};
use combo_cadence::{
    default_catalog, load_catalog, run_session, spawn_key_listener, Result, SequenceGenerator,
};

fn main() -> ExitCode {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match run(&args) {
        Ok(rounds) => {
            info!(rounds, "session finished");
            ExitCode::SUCCESS
        }
        Err(e) => {
            let _ = report_failure(&mut io::stderr(), &e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<u64> {
    let catalog = match &args.catalog {
        Some(path) => load_catalog(path)?,
        None => default_catalog(),
    };

    let config = args.config();
    info!(?config, "starting");
    let mut generator = SequenceGenerator::new(&catalog, &config)?;

    let mut playback: Box<dyn Playback> = if args.mute {
        Box::new(SilentPlayback)
    } else {
        let mut library = ClipLibrary::new(&args.sounds);
        library.preload(generator.working_set().iter().map(|m| m.name.as_str()))?;
        info!(clips = library.cached(), "clips decoded");
        Box::new(SpeakerPlayback::new(library, Speaker::open_default()?))
    };

    let stop = spawn_key_listener(io::stdin())?;
    let mut stdout = io::stdout().lock();
    run_session(&mut generator, &mut playback, &stop, &mut stdout, &args.session_options())
}
