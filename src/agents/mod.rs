//! Decision-time planners and baseline players
//!
//! - `Rhea`: single-agent rolling horizon evolutionary planner
//! - `MultiUnitRhea`: joint-action variant, one plan per controlled unit
//! - `RandomPlayer` / `MultiUnitRandomPlayer`: uniform baselines

pub mod multi_unit_rhea;
pub mod random;
pub mod report;
pub mod rhea;

pub use multi_unit_rhea::MultiUnitRhea;
pub use random::{MultiUnitRandomPlayer, RandomPlayer};
pub use report::SearchReport;
pub use rhea::Rhea;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Deterministic generator when a seed is given, entropy otherwise
pub(crate) fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}
