//! Rollout fitness evaluation
//!
//! A rollout plays a plan forward from a private copy of the state and
//! reports the resulting score. Genes are decoded one step at a time against
//! the live branching factor. A rollout stops early as soon as the state
//! becomes terminal, ignoring any remaining genes.

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, RheaError};
use crate::core::types::{ActionIndex, Fitness};
use crate::genome::{decode, ActionSequence, SequenceArray};
use crate::model::{GameModel, MultiUnitGameModel, StateTransitionListener};

/// Outcome of one rollout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rollout {
    pub fitness: Fitness,
    /// Transitions actually applied
    pub steps: usize,
    /// Hit a terminal state before the plan ran out
    pub terminated_early: bool,
}

fn discounted(score: f64, discount: Option<f64>, steps: usize) -> Fitness {
    match discount {
        Some(d) => score * d.powi(steps as i32),
        None => score,
    }
}

/// Play `seq` from `state` and score the result
pub fn score_sequence<M: GameModel>(
    state: M,
    seq: &ActionSequence,
    discount: Option<f64>,
) -> Result<Rollout> {
    play_sequence(state, seq, discount, None::<&mut dyn StateTransitionListener<M>>)
}

/// As [`score_sequence`], reporting every applied transition to `listener`
///
/// The listener is purely observational; the returned rollout is identical to
/// the unobserved one for a deterministic model.
pub fn score_sequence_observed<M, L>(
    state: M,
    seq: &ActionSequence,
    discount: Option<f64>,
    listener: &mut L,
) -> Result<Rollout>
where
    M: GameModel,
    L: StateTransitionListener<M> + ?Sized,
{
    play_sequence(state, seq, discount, Some(listener))
}

fn play_sequence<M, L>(
    mut state: M,
    seq: &ActionSequence,
    discount: Option<f64>,
    mut listener: Option<&mut L>,
) -> Result<Rollout>
where
    M: GameModel,
    L: StateTransitionListener<M> + ?Sized,
{
    for (step, &gene) in seq.genes().iter().enumerate() {
        if state.is_terminal() {
            return Ok(Rollout {
                fitness: discounted(state.score(), discount, step),
                steps: step,
                terminated_early: true,
            });
        }

        let n_actions = state.n_actions();
        if n_actions == 0 {
            return Err(RheaError::NoLegalActions { unit: None });
        }
        let action = decode(gene, n_actions);

        match listener.as_deref_mut() {
            Some(listener) => {
                let before = state.copy_state()?;
                state.act(action);
                listener.state_transition(&before, action, &state);
            }
            None => state.act(action),
        }
    }

    Ok(Rollout {
        fitness: discounted(state.score(), discount, seq.len()),
        steps: seq.len(),
        terminated_early: false,
    })
}

/// Play one plan per unit from `state`, one joint action per step
///
/// Every unit's `step`-th gene is decoded against that unit's own action
/// count and the whole vector is applied as a single transition.
pub fn score_sequence_array<M: MultiUnitGameModel>(
    mut state: M,
    seqs: &SequenceArray,
) -> Result<Rollout> {
    let horizon = seqs.horizon();

    for step in 0..horizon {
        if state.is_terminal() {
            return Ok(Rollout {
                fitness: state.score(),
                steps: step,
                terminated_early: true,
            });
        }

        let genes = seqs.column(step).unwrap_or_default();
        let actions = decode_joint(&state, &genes)?;
        state.combo_act(&actions);
    }

    Ok(Rollout {
        fitness: state.score(),
        steps: horizon,
        terminated_early: false,
    })
}

/// Decode one gene per unit against each unit's current action count
pub(crate) fn decode_joint<M: MultiUnitGameModel>(
    state: &M,
    genes: &[f64],
) -> Result<Vec<ActionIndex>> {
    genes
        .iter()
        .enumerate()
        .map(|(unit, &gene)| {
            let n_actions = state.n_actions_unit(unit);
            if n_actions == 0 {
                return Err(RheaError::NoLegalActions { unit: Some(unit) });
            }
            Ok(decode(gene, n_actions))
        })
        .collect()
}
