//! Core cadence engine: move table, filtering, rule chain, and round generation.
//!
//! ## Module overview
//!
//! | Module      | Purpose |
//! |-------------|---------|
//! | `models`    | Shared types: moves, sides, limbs, run config, rounds |
//! | `catalog`   | Built-in move table, JSON loading, working-set filter |
//! | `rules`     | Per-slot predicate chain (probability, side, limb position) |
//! | `selector`  | Applies a slot's rule chain and picks one survivor |
//! | `validate`  | Startup check that every reachable slot can be filled |
//! | `generator` | `SequenceGenerator`: builds rounds with side alternation |

pub mod catalog;
pub mod generator;
pub mod models;
pub mod rules;
pub mod selector;
pub mod validate;

pub use catalog::{default_catalog, load_catalog, parse_catalog, working_set};
pub use generator::SequenceGenerator;
pub use models::{CadenceConfig, Limb, Move, Round, Side, SlotContext, DEFAULT_SEED, MAX_SEQUENCE_LENGTH};
pub use selector::select_move;
