use rand::Rng;
use tracing::debug;

use crate::cadence_engine::{
    models::{Move, SlotContext},
    rules::{apply_rules, build_rules},
};
use crate::error::SelectionError;

/// Pick the move for one slot.
///
/// Builds the slot's rule chain, filters the working set with it, then picks
/// uniformly among the survivors. Fails when nothing survives, which can only
/// happen when every structurally eligible candidate lost its probability draw
/// (startup validation rules out the structural cases).
pub fn select_move<R: Rng>(
    working_set: &[Move],
    ctx: &SlotContext<'_>,
    rng: &mut R,
) -> Result<Move, SelectionError> {
    let rules = build_rules(working_set, ctx);
    let allowed = apply_rules(working_set, &rules, rng);

    if allowed.is_empty() {
        return Err(SelectionError::NoEligibleMove {
            position: ctx.position(),
            side: ctx.side,
        });
    }

    let chosen = allowed[rng.gen_range(0..allowed.len())];
    debug!(
        position = ctx.position(),
        side = %ctx.side,
        candidates = allowed.len(),
        chosen = %chosen.name,
        "selected move"
    );
    Ok(chosen.clone())
}
