pub mod config;
pub mod error;
pub mod types;

pub use config::{MultiUnitRheaConfig, RheaConfig, SearchParams};
pub use error::{Result, RheaError};
pub use types::{ActionIndex, Fitness, Gene, PlannerPhase};
