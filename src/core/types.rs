//! Shared planner types

use serde::{Deserialize, Serialize};

/// Index of a discrete action, always below the current branching factor
pub type ActionIndex = usize;

/// Normalized stand-in for an action, in [0, 1)
pub type Gene = f64;

/// Rollout score, possibly discounted
pub type Fitness = f64;

/// Where a planner is within its decision cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlannerPhase {
    /// No decision requested yet
    #[default]
    Idle,
    /// Running mutate-evaluate-accept iterations
    Searching,
    /// An action has been returned for the last request
    Decided,
}
