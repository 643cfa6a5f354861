//! Command-line arguments and their conversion into run settings.

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Parser};

use crate::cadence_engine::{CadenceConfig, DEFAULT_SEED, MAX_SEQUENCE_LENGTH};
use crate::error::Error;
use crate::session::SessionOptions;

/// Strike combination caller: prints a random combo each round and calls it out loud.
#[derive(Parser, Debug)]
#[command(name = "cadence")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Number of distinct moves to keep, simplest first (0 keeps them all)
    #[arg(short = 'd', long = "distinct", default_value_t = 0)]
    pub distinct: usize,

    /// Moves per round
    #[arg(short = 'n', long = "length", default_value = "2", value_parser = parse_length)]
    pub length: usize,

    /// Only leg strikes
    #[arg(long, conflicts_with = "arm_only")]
    pub leg_only: bool,

    /// Only arm strikes
    #[arg(long)]
    pub arm_only: bool,

    /// Pause between rounds, e.g. 1s, 750ms, 1m30s
    #[arg(short = 't', long, default_value = "1s", value_parser = parse_interval)]
    pub interval: Duration,

    /// Random seed; the same seed replays the same rounds
    #[arg(short, long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,

    /// Seed from OS entropy instead of --seed
    #[arg(long, conflicts_with = "seed")]
    pub random: bool,

    /// Directory holding one <move>.mp3 clip per move
    #[arg(long, default_value = "sound")]
    pub sounds: PathBuf,

    /// JSON move table replacing the built-in one
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Print rounds without playing audio
    #[arg(short, long)]
    pub mute: bool,

    /// Stop after this many rounds (default: until a key is pressed)
    #[arg(short, long)]
    pub rounds: Option<u64>,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn config(&self) -> CadenceConfig {
        CadenceConfig {
            sequence_length: self.length,
            max_distinct: self.distinct,
            arm_only: self.arm_only,
            leg_only: self.leg_only,
            interval: self.interval,
            rng_seed: if self.random { None } else { Some(self.seed) },
        }
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions { interval: self.interval, max_rounds: self.rounds }
    }

    /// Default `tracing` filter for the verbosity level; `RUST_LOG` overrides it.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Tell the user why the run ended, as a single line on `out`.
pub fn report_failure<W: Write + ?Sized>(out: &mut W, err: &Error) -> io::Result<()> {
    writeln!(out, "cadence: {err}")
}

fn parse_length(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("a round needs at least one move".into()),
        Ok(n) if n > MAX_SEQUENCE_LENGTH => Err(format!("at most {MAX_SEQUENCE_LENGTH} moves per round")),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Parse a duration written as `<number><unit>` groups, e.g. `1s`, `250ms`,
/// `1m30s`, `1.5h`. Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare
/// `0` is accepted; negative values are not.
pub fn parse_interval(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s == "0" {
        return Ok(Duration::ZERO);
    }
    if s.starts_with('-') {
        return Err(format!("interval '{s}' must not be negative"));
    }
    let mut rest = s.strip_prefix('+').unwrap_or(s);
    if rest.is_empty() {
        return Err("empty interval".into());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let (int_part, after) = rest.split_at(int_len);

        let (frac_part, after) = match after.strip_prefix('.') {
            Some(tail) => {
                let n = tail.find(|c: char| !c.is_ascii_digit()).unwrap_or(tail.len());
                tail.split_at(n)
            }
            None => ("", after),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(format!("invalid interval '{s}'"));
        }

        let unit_len = after
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after.len());
        let (unit, tail) = after.split_at(unit_len);
        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60 * 1_000_000_000,
            "h" => 3_600 * 1_000_000_000,
            "" => return Err(format!("missing unit in interval '{s}'")),
            other => return Err(format!("unknown unit '{other}' in interval '{s}'")),
        };

        let too_long = || format!("interval '{s}' is too long");
        let whole: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| too_long())?
        };
        let mut nanos = whole.checked_mul(scale).ok_or_else(too_long)?;

        // Digits beyond nanosecond precision are dropped.
        let frac_digits = &frac_part[..frac_part.len().min(18)];
        if !frac_digits.is_empty() {
            let frac: u128 = frac_digits.parse().map_err(|_| too_long())?;
            let denom = 10u128.pow(frac_digits.len() as u32);
            nanos += frac * scale / denom;
        }

        total = total.checked_add(nanos).ok_or_else(too_long)?;
        rest = tail;
    }

    let nanos = u64::try_from(total).map_err(|_| format!("interval '{s}' is too long"))?;
    Ok(Duration::from_nanos(nanos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("cadence").chain(args.iter().copied()))
    }

    #[test]
    fn interval_accepts_common_forms() {
        assert_eq!(parse_interval("1s"), Ok(Duration::from_secs(1)));
        assert_eq!(parse_interval("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_interval("1m30s"), Ok(Duration::from_secs(90)));
        assert_eq!(parse_interval("1.5s"), Ok(Duration::from_millis(1_500)));
        assert_eq!(parse_interval(".5h"), Ok(Duration::from_secs(1_800)));
        assert_eq!(parse_interval("2h45m"), Ok(Duration::from_secs(9_900)));
        assert_eq!(parse_interval("10us"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_interval("10µs"), Ok(Duration::from_micros(10)));
        assert_eq!(parse_interval("7ns"), Ok(Duration::from_nanos(7)));
        assert_eq!(parse_interval("+3s"), Ok(Duration::from_secs(3)));
        assert_eq!(parse_interval("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn interval_rejects_bad_input() {
        for bad in ["", "5", "-1s", "1x", "s", "1.s.", "1..5s", "99999999999999999999h"] {
            assert!(parse_interval(bad).is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn defaults_match_a_plain_run() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.config(), CadenceConfig::default());
        assert_eq!(args.session_options(), SessionOptions::default());
        assert_eq!(args.sounds, PathBuf::from("sound"));
        assert!(!args.mute);
        assert_eq!(args.log_filter(), "warn");
    }

    #[test]
    fn short_flags_fill_the_config() {
        let args = parse(&["-d", "3", "-n", "5", "-t", "2s", "--arm-only", "-s", "9", "-r", "4", "-vv"]).unwrap();
        let config = args.config();
        assert_eq!(config.max_distinct, 3);
        assert_eq!(config.sequence_length, 5);
        assert_eq!(config.interval, Duration::from_secs(2));
        assert!(config.arm_only && !config.leg_only);
        assert_eq!(config.rng_seed, Some(9));
        assert_eq!(args.rounds, Some(4));
        assert_eq!(args.log_filter(), "trace");
    }

    #[test]
    fn random_drops_the_seed() {
        assert_eq!(parse(&["--random"]).unwrap().config().rng_seed, None);
        assert!(parse(&["--random", "--seed", "4"]).is_err());
    }

    #[test]
    fn failure_is_reported_once() {
        let mut out = Vec::new();
        report_failure(&mut out, &Error::Config(ConfigError::ZeroSequenceLength)).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "cadence: sequence length must be at least 1\n");
    }

    #[test]
    fn conflicting_or_invalid_flags_fail() {
        assert!(parse(&["--arm-only", "--leg-only"]).is_err());
        assert!(parse(&["-n", "0"]).is_err());
        assert!(parse(&["-n", "33"]).is_err());
        assert!(parse(&["-n", "18446744073709551615"]).is_err());
        assert_eq!(parse(&["-n", "32"]).unwrap().length, MAX_SEQUENCE_LENGTH);
        assert!(parse(&["-t", "soon"]).is_err());
    }
}
