//! Model capability contract
//!
//! Planners never see the rules of a game. They only drive it through these
//! traits:
//! - `GameModel` for a single controlled agent
//! - `MultiUnitGameModel` when several units act together each step
//!
//! Concrete environments implement the traits; planners are generic over them.

pub mod listener;

pub use listener::{StateTransitionListener, TransitionRecord, TransitionRecorder};

use std::ops::Range;

use crate::core::error::Result;
use crate::core::types::ActionIndex;

/// Simulation surface for a single controlled agent
///
/// `score` must be meaningful in any state, not only terminal ones. For a
/// fixed action sequence the score should be reproducible; a stochastic model
/// makes planner results correspondingly non-reproducible.
pub trait GameModel: Sized {
    /// Number of legal actions from the current state
    fn n_actions(&self) -> usize;

    /// Apply one action in place
    fn act(&mut self, action: ActionIndex);

    fn score(&self) -> f64;

    fn is_terminal(&self) -> bool;

    /// Fully independent deep copy
    ///
    /// A failure here is an integration error and is propagated straight out
    /// of the planner.
    fn copy_state(&self) -> Result<Self>;

    /// Legal action indices
    fn actions(&self) -> Range<ActionIndex> {
        0..self.n_actions()
    }

    /// Copy of this state with `action` applied
    fn child(&self, action: ActionIndex) -> Result<Self> {
        let mut next = self.copy_state()?;
        next.act(action);
        Ok(next)
    }

    /// One child per legal action, in index order
    fn children(&self) -> Result<Vec<Self>> {
        self.actions().map(|a| self.child(a)).collect()
    }
}

/// Simulation surface for several units acting in lock-step
pub trait MultiUnitGameModel: GameModel {
    fn n_units(&self) -> usize;

    /// Number of legal actions for unit `unit`
    fn n_actions_unit(&self, unit: usize) -> usize;

    /// Apply one joint action: every unit acts within the same step
    fn combo_act(&mut self, actions: &[ActionIndex]);

    /// Per-unit action counts
    fn action_space(&self) -> Vec<usize> {
        (0..self.n_units()).map(|i| self.n_actions_unit(i)).collect()
    }
}

/// Anything that picks one action per decision
pub trait SimplePlayer<M: GameModel> {
    fn get_action(&mut self, state: &M) -> Result<ActionIndex>;
}

/// Anything that picks a joint action per decision
pub trait MultiUnitPlayer<M: MultiUnitGameModel> {
    fn get_actions(&mut self, state: &M) -> Result<Vec<ActionIndex>>;
}
