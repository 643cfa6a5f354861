//! Startup check that every slot the generator will visit can be filled.
//!
//! Side alternation carries across rounds, so a slot's side depends on the
//! round's parity when the length is odd. Walking two consecutive rounds
//! therefore visits every (position, side) pair the session can produce.

use std::collections::HashSet;

use tracing::warn;

use crate::cadence_engine::{
    models::{CadenceConfig, Move, Side},
    rules::{is_mixed, limb_requirement, slot_rules},
};
use crate::error::ConfigError;

/// Reject working sets that leave some reachable slot with no candidate.
///
/// Only the rules that need no random draw are evaluated, plus the one sure
/// outcome of the draw: a move with `skip >= 1` never passes it. Slots whose
/// every candidate carries a non-zero skip probability can still come up empty
/// at run time; those are reported with a warning.
pub fn validate_working_set(working_set: &[Move], config: &CadenceConfig) -> Result<(), ConfigError> {
    if working_set.is_empty() {
        return Err(ConfigError::EmptyWorkingSet {
            sequence_length: config.sequence_length,
            max_distinct: config.max_distinct,
            arm_only: config.arm_only,
            leg_only: config.leg_only,
        });
    }

    let len = config.sequence_length;
    let mixed = is_mixed(working_set);
    let mut warned = HashSet::new();
    let mut side = Side::Lead;

    for _round in 0..2 {
        for position in 0..len {
            let rules = slot_rules(mixed, side, position, len);
            let candidates: Vec<&Move> = working_set
                .iter()
                .filter(|m| m.skip < 1.0 && rules.iter().all(|r| r.check(m).unwrap_or(true)))
                .collect();

            if candidates.is_empty() {
                return Err(ConfigError::UnsatisfiableSlot {
                    position,
                    side,
                    limb: limb_requirement(mixed, position, len),
                });
            }

            if candidates.iter().all(|m| m.skip > 0.0) && warned.insert((position, side)) {
                warn!(
                    position,
                    side = %side,
                    "every candidate for this slot can be skipped; a round may fail to fill it"
                );
            }

            side = side.flip();
        }
    }

    Ok(())
}
