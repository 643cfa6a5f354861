use std::fmt;
use std::time::Duration;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Move primitives
// ---------------------------------------------------------------------------

/// Which limb delivers the strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Limb {
    #[default]
    Arm,
    Leg,
}

impl fmt::Display for Limb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limb::Arm => write!(f, "arm"),
            Limb::Leg => write!(f, "leg"),
        }
    }
}

/// The attacking position a move is thrown from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Lead,
    Rear,
}

impl Side {
    /// The other side; the generator flips after every move.
    pub fn flip(self) -> Side {
        match self {
            Side::Lead => Side::Rear,
            Side::Rear => Side::Lead,
        }
    }

    /// One-letter marker used at the start of a printed round.
    pub fn marker(self) -> &'static str {
        match self {
            Side::Lead => "L",
            Side::Rear => "R",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Lead => write!(f, "lead"),
            Side::Rear => write!(f, "rear"),
        }
    }
}

/// A single strike definition.
///
/// `skip` is an inverse weight: `0.0` means the move always survives the
/// probability draw, `1.0` means it never does. Leaving it out of a catalog
/// file keeps the move always eligible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    #[serde(default)]
    pub lead: bool,
    #[serde(default)]
    pub rear: bool,
    #[serde(default)]
    pub limb: Limb,
    #[serde(default)]
    pub skip: f64,
}

impl Move {
    pub fn new(name: impl Into<String>, lead: bool, rear: bool, limb: Limb, skip: f64) -> Self {
        Move { name: name.into(), lead, rear, limb, skip }
    }

    pub fn is_leg(&self) -> bool {
        self.limb == Limb::Leg
    }

    /// Can this move be thrown from `side`?
    pub fn allows_side(&self, side: Side) -> bool {
        match side {
            Side::Lead => self.lead,
            Side::Rear => self.rear,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Seed used when the caller does not supply one, so plain runs repeat.
pub const DEFAULT_SEED: u64 = 2;

/// Longest round a session may call.
pub const MAX_SEQUENCE_LENGTH: usize = 32;

/// Immutable snapshot of one run's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CadenceConfig {
    /// Moves per round. Must be at least 1.
    pub sequence_length: usize,
    /// Cap on the working set size after filtering; `0` keeps everything.
    pub max_distinct: usize,
    pub arm_only: bool,
    pub leg_only: bool,
    /// Pause between rounds.
    pub interval: Duration,
    /// `None` draws the seed from OS entropy.
    pub rng_seed: Option<u64>,
}

impl CadenceConfig {
    /// Defaults for everything except the round length.
    pub fn new(sequence_length: usize) -> Self {
        CadenceConfig { sequence_length, ..Self::default() }
    }
}

impl Default for CadenceConfig {
    fn default() -> Self {
        CadenceConfig {
            sequence_length: 2,
            max_distinct: 0,
            arm_only: false,
            leg_only: false,
            interval: Duration::from_secs(1),
            rng_seed: Some(DEFAULT_SEED),
        }
    }
}

// ---------------------------------------------------------------------------
// Selection context / output
// ---------------------------------------------------------------------------

/// Everything a rule needs to know about the slot being filled.
#[derive(Debug, Clone, Copy)]
pub struct SlotContext<'a> {
    pub side: Side,
    /// Moves already chosen earlier in the same round.
    pub prior: &'a [Move],
    pub sequence_length: usize,
}

impl SlotContext<'_> {
    /// Zero-based index of the slot being filled.
    pub fn position(&self) -> usize {
        self.prior.len()
    }
}

/// One generated round: the side its first move was thrown from plus the moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub start_side: Side,
    pub moves: Vec<Move>,
}

impl Round {
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.moves.iter().map(|m| m.name.as_str())
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.start_side.marker())?;
        for m in &self.moves {
            write!(f, " {}", m.name)?;
        }
        Ok(())
    }
}
