//! Per-decision search summary

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::types::{ActionIndex, Fitness};

/// What happened during the last decision of a planner
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    pub iterations: usize,
    /// Mutants that replaced the incumbent (ties included)
    pub accepted: usize,
    /// Incumbent fitness after each iteration
    pub fitness_trace: Vec<Fitness>,
    /// Decided action, or joint action for multi-unit planners
    pub actions: Vec<ActionIndex>,
    pub elapsed_us: u64,
}

impl SearchReport {
    pub(crate) fn new(
        iterations: usize,
        accepted: usize,
        fitness_trace: Vec<Fitness>,
        actions: Vec<ActionIndex>,
        elapsed: Duration,
    ) -> Self {
        Self {
            iterations,
            accepted,
            fitness_trace,
            actions,
            elapsed_us: elapsed.as_micros() as u64,
        }
    }

    /// Incumbent fitness at the end of the search, if any iteration ran
    pub fn final_fitness(&self) -> Option<Fitness> {
        self.fitness_trace.last().copied()
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.iterations == 0 {
            return 0.0;
        }
        self.accepted as f64 / self.iterations as f64
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(&self).unwrap_or_else(|_| "{}".to_string())
    }
}
