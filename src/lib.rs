//! RHEA Planner - rolling horizon evolutionary planning for simulations

pub mod agents;
pub mod core;
pub mod genome;
pub mod model;
pub mod rollout;
pub mod stats;

pub use crate::agents::{MultiUnitRhea, Rhea, SearchReport};
pub use crate::core::{MultiUnitRheaConfig, Result, RheaConfig, RheaError};
pub use crate::model::{GameModel, MultiUnitGameModel, StateTransitionListener};
