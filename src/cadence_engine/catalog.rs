//! The move table and the startup filter that turns it into the working set.
//!
//! Catalog order matters: truncation by `max_distinct` keeps the first moves,
//! so the table is ordered from the simplest strike to the most demanding.

use std::collections::HashSet;
use std::path::Path;

use crate::cadence_engine::models::{CadenceConfig, Limb, Move};
use crate::error::CatalogError;

/// The built-in move table, simplest first.
pub fn default_catalog() -> Vec<Move> {
    vec![
        Move::new("jab",      true,  false, Limb::Arm, 0.0),
        Move::new("direto",   false, true,  Limb::Arm, 0.0),
        Move::new("cruza",    true,  true,  Limb::Arm, 0.3),
        Move::new("chuta",    true,  true,  Limb::Leg, 0.0),
        Move::new("tip",      true,  true,  Limb::Leg, 0.5),
        Move::new("upper",    true,  true,  Limb::Arm, 0.3),
        Move::new("cotovelo", true,  true,  Limb::Arm, 0.5),
        Move::new("joelho",   true,  true,  Limb::Leg, 0.5),
    ]
}

/// Parse a JSON array of moves and validate it.
pub fn parse_catalog(json: &str) -> Result<Vec<Move>, CatalogError> {
    let moves: Vec<Move> = serde_json::from_str(json)?;
    validate_catalog(&moves)?;
    Ok(moves)
}

/// Read a move table from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Vec<Move>, CatalogError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&json)
}

/// Reject tables the rule engine cannot work with sensibly.
pub fn validate_catalog(moves: &[Move]) -> Result<(), CatalogError> {
    if moves.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::new();
    for m in moves {
        if m.name.trim().is_empty() {
            return Err(CatalogError::EmptyName(m.name.clone()));
        }
        if !seen.insert(m.name.as_str()) {
            return Err(CatalogError::DuplicateMove(m.name.clone()));
        }
        // Also rejects NaN.
        if !(0.0..=1.0).contains(&m.skip) {
            return Err(CatalogError::InvalidSkipProbability {
                name: m.name.clone(),
                value: m.skip,
            });
        }
        if !m.lead && !m.rear {
            return Err(CatalogError::NoSide(m.name.clone()));
        }
    }
    Ok(())
}

/// Apply the run-wide options to the catalog, producing the working set.
///
/// Every move is judged on its own first; truncation to `max_distinct` happens
/// afterwards, in catalog order. Leg strikes are dropped from 2- and 3-move
/// rounds unless leg-only mode asks for them. The input is left untouched and
/// the result may be empty.
pub fn working_set(catalog: &[Move], config: &CadenceConfig) -> Vec<Move> {
    let short_round = config.sequence_length > 1 && config.sequence_length < 4;

    let mut result: Vec<Move> = catalog
        .iter()
        .filter(|m| {
            if config.leg_only {
                m.is_leg()
            } else if config.arm_only {
                !m.is_leg()
            } else {
                !(m.is_leg() && short_round)
            }
        })
        .cloned()
        .collect();

    if config.max_distinct != 0 && result.len() > config.max_distinct {
        result.truncate(config.max_distinct);
    }

    result
}
