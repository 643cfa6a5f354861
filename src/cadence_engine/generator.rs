use rand::{rngs::StdRng, SeedableRng};
use tracing::info;

use crate::cadence_engine::{
    catalog::working_set,
    models::{CadenceConfig, Move, Round, Side, SlotContext, MAX_SEQUENCE_LENGTH},
    selector::select_move,
    validate::validate_working_set,
};
use crate::error::{ConfigError, Result};

/// Produces rounds one after another from a fixed working set.
///
/// The side flips after every move, whatever was picked, and the flip carries
/// over between rounds: with an odd round length consecutive rounds start on
/// alternating sides.
#[derive(Debug)]
pub struct SequenceGenerator {
    working_set: Vec<Move>,
    sequence_length: usize,
    side: Side,
    rng: StdRng,
}

impl SequenceGenerator {
    /// Filter `catalog` with `config`, validate the result, and seed the RNG.
    pub fn new(catalog: &[Move], config: &CadenceConfig) -> Result<Self> {
        if config.sequence_length == 0 {
            return Err(ConfigError::ZeroSequenceLength.into());
        }
        if config.sequence_length > MAX_SEQUENCE_LENGTH {
            return Err(ConfigError::SequenceTooLong {
                length: config.sequence_length,
                max: MAX_SEQUENCE_LENGTH,
            }
            .into());
        }

        let working_set = working_set(catalog, config);
        validate_working_set(&working_set, config)?;

        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None       => StdRng::from_entropy(),
        };

        info!(
            moves = ?working_set.iter().map(|m| m.name.as_str()).collect::<Vec<_>>(),
            sequence_length = config.sequence_length,
            seed = ?config.rng_seed,
            "working set ready"
        );

        Ok(SequenceGenerator {
            working_set,
            sequence_length: config.sequence_length,
            side: Side::Lead,
            rng,
        })
    }

    pub fn working_set(&self) -> &[Move] {
        &self.working_set
    }

    /// Side the next move will be thrown from.
    pub fn next_side(&self) -> Side {
        self.side
    }

    /// Build the next round, feeding each pick back into the following slot.
    ///
    /// A round that cannot be filled leaves the side where it was, so the next
    /// attempt starts from the same side.
    pub fn next_round(&mut self) -> Result<Round> {
        let start_side = self.side;
        let mut moves: Vec<Move> = Vec::with_capacity(self.sequence_length);
        let mut side = start_side;

        for _ in 0..self.sequence_length {
            let ctx = SlotContext {
                side,
                prior: &moves,
                sequence_length: self.sequence_length,
            };
            let chosen = select_move(&self.working_set, &ctx, &mut self.rng)?;
            moves.push(chosen);
            side = side.flip();
        }

        self.side = side;
        Ok(Round { start_side, moves })
    }
}

impl Iterator for SequenceGenerator {
    type Item = Result<Round>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_round())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cadence_engine::{catalog::default_catalog, models::Limb};

    #[test]
    fn rounds_have_configured_length() {
        for len in 1..=6 {
            let mut g = SequenceGenerator::new(&default_catalog(), &CadenceConfig::new(len)).unwrap();
            for _ in 0..20 {
                assert_eq!(g.next_round().unwrap().moves.len(), len);
            }
        }
    }

    #[test]
    fn odd_lengths_alternate_the_starting_side() {
        let mut g = SequenceGenerator::new(&default_catalog(), &CadenceConfig::new(3)).unwrap();
        let starts: Vec<Side> = (0..4).map(|_| g.next_round().unwrap().start_side).collect();
        assert_eq!(starts, [Side::Lead, Side::Rear, Side::Lead, Side::Rear]);
    }

    #[test]
    fn even_lengths_always_start_on_lead() {
        let mut g = SequenceGenerator::new(&default_catalog(), &CadenceConfig::new(4)).unwrap();
        for _ in 0..10 {
            assert_eq!(g.next_round().unwrap().start_side, Side::Lead);
        }
        assert_eq!(g.next_side(), Side::Lead);
    }

    #[test]
    fn zero_length_is_rejected() {
        let err = SequenceGenerator::new(&default_catalog(), &CadenceConfig::new(0)).unwrap_err();
        assert!(matches!(err, crate::Error::Config(ConfigError::ZeroSequenceLength)));
    }

    #[test]
    fn overlong_rounds_are_rejected() {
        assert!(SequenceGenerator::new(&default_catalog(), &CadenceConfig::new(MAX_SEQUENCE_LENGTH)).is_ok());
        let err = SequenceGenerator::new(&default_catalog(), &CadenceConfig::new(MAX_SEQUENCE_LENGTH + 1)).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Config(ConfigError::SequenceTooLong { length, max: MAX_SEQUENCE_LENGTH })
                if length == MAX_SEQUENCE_LENGTH + 1
        ));
    }

    #[test]
    fn failed_round_keeps_the_starting_side() {
        let catalog = [
            Move::new("jab", true, false, Limb::Arm, 0.0),
            Move::new("direto", false, true, Limb::Arm, 0.999),
        ];
        let config = CadenceConfig { rng_seed: Some(3), ..CadenceConfig::new(3) };
        let mut g = SequenceGenerator::new(&catalog, &config).unwrap();

        let mut failures = 0;
        for _ in 0..30 {
            let before = g.next_side();
            match g.next_round() {
                Ok(round) => {
                    assert_eq!(round.start_side, before);
                    assert_eq!(g.next_side(), before.flip());
                }
                Err(_) => {
                    failures += 1;
                    assert_eq!(g.next_side(), before);
                }
            }
        }
        assert!(failures > 0);
    }

    #[test]
    fn iterator_yields_rounds() {
        let g = SequenceGenerator::new(&default_catalog(), &CadenceConfig::new(5)).unwrap();
        let rounds: Vec<Round> = g.take(10).collect::<Result<_>>().unwrap();
        assert_eq!(rounds.len(), 10);
        assert!(rounds.iter().all(|r| r.moves[4].limb == Limb::Leg));
    }
}
