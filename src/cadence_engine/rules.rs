//! Predicates deciding which moves may fill a slot.
//!
//! A slot's rule chain is built from its [`SlotContext`] and the shape of the
//! working set, then every candidate must pass every rule. Rules are plain
//! values so a chain can be inspected and tested without running a draw.

use rand::Rng;

use crate::cadence_engine::models::{Limb, Move, Side, SlotContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Fresh uniform draw `p` in [0, 1) per candidate; passes iff `skip <= p`.
    Probability,
    /// The move must be usable from this side.
    Side(Side),
    /// The move must use this limb.
    Limb(Limb),
}

impl Rule {
    /// Evaluate the rule for one candidate. Only `Probability` touches `rng`.
    pub fn allows<R: Rng>(&self, m: &Move, rng: &mut R) -> bool {
        match self.check(m) {
            Some(pass) => pass,
            None => {
                let p: f64 = rng.gen();
                m.skip <= p
            }
        }
    }

    /// Outcome for rules that need no draw; `None` for `Probability`.
    pub fn check(&self, m: &Move) -> Option<bool> {
        match *self {
            Rule::Probability => None,
            Rule::Side(side) => Some(m.allows_side(side)),
            Rule::Limb(limb) => Some(m.limb == limb),
        }
    }
}

/// Does the set contain both arm and leg moves?
pub fn is_mixed(moves: &[Move]) -> bool {
    let has_leg = moves.iter().any(Move::is_leg);
    let has_arm = moves.iter().any(|m| !m.is_leg());
    has_leg && has_arm
}

/// Limb a slot is restricted to, if any.
///
/// Only mixed sets get a limb constraint: rounds of four or more finish with a
/// leg strike, every other slot of a multi-move round stays on the arms, and a
/// single-move round may be anything.
pub fn limb_requirement(mixed: bool, position: usize, sequence_length: usize) -> Option<Limb> {
    if !mixed {
        return None;
    }
    if sequence_length >= 4 && position + 1 == sequence_length {
        Some(Limb::Leg)
    } else if sequence_length != 1 {
        Some(Limb::Arm)
    } else {
        None
    }
}

/// Rule chain for a slot described by its raw coordinates.
pub fn slot_rules(mixed: bool, side: Side, position: usize, sequence_length: usize) -> Vec<Rule> {
    let mut rules = vec![Rule::Probability, Rule::Side(side)];
    if let Some(limb) = limb_requirement(mixed, position, sequence_length) {
        rules.push(Rule::Limb(limb));
    }
    rules
}

/// Build the ordered rule chain for one slot.
pub fn build_rules(working_set: &[Move], ctx: &SlotContext<'_>) -> Vec<Rule> {
    slot_rules(is_mixed(working_set), ctx.side, ctx.position(), ctx.sequence_length)
}

/// Keep the moves that pass every rule, in working-set order.
///
/// Rules short-circuit in chain order, so each candidate consumes exactly one
/// draw when `Probability` leads the chain.
pub fn apply_rules<'a, R: Rng>(
    working_set: &'a [Move],
    rules: &[Rule],
    rng: &mut R,
) -> Vec<&'a Move> {
    working_set
        .iter()
        .filter(|m| rules.iter().all(|r| r.allows(m, &mut *rng)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn jab() -> Move { Move::new("jab", true, false, Limb::Arm, 0.0) }
    fn direto() -> Move { Move::new("direto", false, true, Limb::Arm, 0.0) }
    fn chuta() -> Move { Move::new("chuta", true, true, Limb::Leg, 0.0) }

    fn ctx(side: Side, prior: &[Move], sequence_length: usize) -> SlotContext<'_> {
        SlotContext { side, prior, sequence_length }
    }

    #[test]
    fn probability_rule_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let always = Move::new("a", true, true, Limb::Arm, 0.0);
        let never = Move::new("n", true, true, Limb::Arm, 1.0);
        for _ in 0..1_000 {
            assert!(Rule::Probability.allows(&always, &mut rng));
            assert!(!Rule::Probability.allows(&never, &mut rng));
        }
    }

    #[test]
    fn probability_rule_tracks_skip_weight() {
        let mut rng = StdRng::seed_from_u64(11);
        let half = Move::new("h", true, true, Limb::Arm, 0.5);
        let passed = (0..10_000).filter(|_| Rule::Probability.allows(&half, &mut rng)).count();
        assert!((4_500..5_500).contains(&passed), "passed {passed} of 10000");
    }

    #[test]
    fn side_rule_uses_eligibility_flags() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(Rule::Side(Side::Lead).allows(&jab(), &mut rng));
        assert!(!Rule::Side(Side::Rear).allows(&jab(), &mut rng));
        assert!(Rule::Side(Side::Rear).allows(&direto(), &mut rng));
        assert!(!Rule::Side(Side::Lead).allows(&direto(), &mut rng));
    }

    #[test]
    fn limb_rule_added_only_for_mixed_sets() {
        let mixed = [jab(), direto(), chuta()];
        let arms = [jab(), direto()];
        let legs = [chuta()];
        let c = ctx(Side::Lead, &[], 2);

        assert_eq!(build_rules(&mixed, &c), [Rule::Probability, Rule::Side(Side::Lead), Rule::Limb(Limb::Arm)]);
        assert_eq!(build_rules(&arms, &c), [Rule::Probability, Rule::Side(Side::Lead)]);
        assert_eq!(build_rules(&legs, &c), [Rule::Probability, Rule::Side(Side::Lead)]);
    }

    #[test]
    fn long_rounds_finish_with_a_leg() {
        assert_eq!(limb_requirement(true, 3, 4), Some(Limb::Leg));
        assert_eq!(limb_requirement(true, 2, 4), Some(Limb::Arm));
        assert_eq!(limb_requirement(true, 2, 3), Some(Limb::Arm));
        assert_eq!(limb_requirement(false, 3, 4), None);
    }

    #[test]
    fn build_rules_reads_position_from_prior_moves() {
        let set = [jab(), direto(), chuta()];
        let prior = [jab(), direto(), jab()];
        let last = ctx(Side::Rear, &prior, 4);
        assert_eq!(build_rules(&set, &last).last(), Some(&Rule::Limb(Limb::Leg)));
    }

    #[test]
    fn single_move_rounds_have_no_limb_constraint() {
        assert_eq!(limb_requirement(true, 0, 1), None);
    }

    #[test]
    fn apply_rules_keeps_working_set_order() {
        let set = [jab(), chuta(), Move::new("cruza", true, true, Limb::Arm, 0.0)];
        let mut rng = StdRng::seed_from_u64(3);
        let allowed = apply_rules(&set, &[Rule::Probability, Rule::Side(Side::Lead)], &mut rng);
        let names: Vec<&str> = allowed.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["jab", "chuta", "cruza"]);
    }

    #[test]
    fn check_skips_only_the_probability_rule() {
        assert_eq!(Rule::Probability.check(&jab()), None);
        assert_eq!(Rule::Side(Side::Lead).check(&jab()), Some(true));
        assert_eq!(Rule::Limb(Limb::Leg).check(&jab()), Some(false));
    }
}
