//! Uniform random baseline players

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::agents::seeded_rng;
use crate::core::error::{Result, RheaError};
use crate::core::types::ActionIndex;
use crate::model::{GameModel, MultiUnitGameModel, MultiUnitPlayer, SimplePlayer};

/// Plays a uniformly random legal action
pub struct RandomPlayer {
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: seeded_rng(seed),
        }
    }
}

impl<M: GameModel> SimplePlayer<M> for RandomPlayer {
    fn get_action(&mut self, state: &M) -> Result<ActionIndex> {
        let n_actions = state.n_actions();
        if n_actions == 0 {
            return Err(RheaError::NoLegalActions { unit: None });
        }
        Ok(self.rng.gen_range(0..n_actions))
    }
}

/// Plays a uniformly random legal action for every unit
pub struct MultiUnitRandomPlayer {
    rng: ChaCha8Rng,
}

impl MultiUnitRandomPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: seeded_rng(seed),
        }
    }
}

impl<M: MultiUnitGameModel> MultiUnitPlayer<M> for MultiUnitRandomPlayer {
    fn get_actions(&mut self, state: &M) -> Result<Vec<ActionIndex>> {
        (0..state.n_units())
            .map(|unit| match state.n_actions_unit(unit) {
                0 => Err(RheaError::NoLegalActions { unit: Some(unit) }),
                n => Ok(self.rng.gen_range(0..n)),
            })
            .collect()
    }
}
