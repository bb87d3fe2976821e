//! Passive observers of rollout transitions
//!
//! A listener sees every transition a rollout applies, as
//! (state before, action, state after). It cannot influence fitness or
//! control flow: it only receives shared references.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::core::types::ActionIndex;
use crate::model::GameModel;

pub trait StateTransitionListener<M> {
    fn state_transition(&mut self, state: &M, action: ActionIndex, next_state: &M);
}

impl<M, L: StateTransitionListener<M> + ?Sized> StateTransitionListener<M> for &mut L {
    fn state_transition(&mut self, state: &M, action: ActionIndex, next_state: &M) {
        (**self).state_transition(state, action, next_state);
    }
}

/// Shared handle, so the caller can inspect a listener owned by a planner
impl<M, L: StateTransitionListener<M> + ?Sized> StateTransitionListener<M> for Rc<RefCell<L>> {
    fn state_transition(&mut self, state: &M, action: ActionIndex, next_state: &M) {
        self.borrow_mut().state_transition(state, action, next_state);
    }
}

/// One observed transition
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub action: ActionIndex,
    pub score_before: f64,
    pub score_after: f64,
}

/// Listener that stores the transitions it is shown
///
/// An unbounded recorder attached to a planner grows by up to
/// `iterations * horizon` records per decision; call `clear()` between
/// decisions or build it with `bounded`. A bounded recorder keeps the first
/// `limit` records and only counts the rest.
#[derive(Debug, Clone, Default)]
pub struct TransitionRecorder {
    records: Vec<TransitionRecord>,
    limit: Option<usize>,
    seen: usize,
}

impl TransitionRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounded(limit: usize) -> Self {
        Self {
            records: Vec::with_capacity(limit),
            limit: Some(limit),
            seen: 0,
        }
    }

    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// Stored records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every transition shown, stored or not
    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn is_full(&self) -> bool {
        self.limit.is_some_and(|limit| self.records.len() >= limit)
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.seen = 0;
    }

    /// Mean score change per recorded transition
    pub fn mean_score_delta(&self) -> Option<f64> {
        if self.records.is_empty() {
            return None;
        }
        let total: f64 = self
            .records
            .iter()
            .map(|r| r.score_after - r.score_before)
            .sum();
        Some(total / self.records.len() as f64)
    }
}

impl<M: GameModel> StateTransitionListener<M> for TransitionRecorder {
    fn state_transition(&mut self, state: &M, action: ActionIndex, next_state: &M) {
        let record = TransitionRecord {
            action,
            score_before: state.score(),
            score_after: next_state.score(),
        };
        tracing::trace!(
            "Transition: action {} moved score {} -> {}",
            record.action,
            record.score_before,
            record.score_after
        );
        self.seen += 1;
        if !self.is_full() {
            self.records.push(record);
        }
    }
}
