//! Planner configuration
//!
//! Both planners share the same search parameters. The single-agent planner
//! additionally accepts a discount factor; the multi-unit planner does not.
//! Configurations are plain values handed to a planner at construction and
//! validated there. There is no global configuration state.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{Result, RheaError};

/// Search parameters common to every planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParams {
    /// Number of genes in every candidate plan (L)
    ///
    /// Each gene stands for one future simulated step. Longer horizons see
    /// further ahead but every rollout costs proportionally more.
    pub horizon: usize,

    /// Mutate-evaluate-accept iterations per decision (N)
    ///
    /// Each iteration runs two rollouts. Zero is legal and disables search:
    /// the planner returns the head of its current plan untouched.
    pub iterations: usize,

    /// Per-gene probability of being resampled during mutation
    pub mutation_probability: f64,

    /// Keep the shifted plan between decisions instead of starting fresh
    pub warm_start: bool,

    /// Seed for the planner's random source; entropy when absent
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            horizon: 5,
            iterations: 10,
            mutation_probability: 0.2,
            warm_start: true,
            rng_seed: None,
        }
    }
}

impl SearchParams {
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(RheaError::InvalidConfiguration(
                "horizon must be greater than zero".into(),
            ));
        }

        if !(0.0..=1.0).contains(&self.mutation_probability) {
            return Err(RheaError::InvalidConfiguration(format!(
                "mutation_probability ({}) must lie in [0, 1]",
                self.mutation_probability
            )));
        }

        Ok(())
    }
}

/// Configuration for the single-agent planner
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RheaConfig {
    #[serde(flatten)]
    pub search: SearchParams,

    /// Scale rollout scores by `discount^steps`; unscaled when absent
    #[serde(default)]
    pub discount: Option<f64>,
}

impl RheaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.search.horizon = horizon;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.search.iterations = iterations;
        self
    }

    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.search.mutation_probability = p;
        self
    }

    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.search.warm_start = warm_start;
        self
    }

    pub fn with_discount(mut self, discount: Option<f64>) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.search.rng_seed = Some(seed);
        self
    }

    /// Validate every field
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;

        if let Some(discount) = self.discount {
            // NaN fails both comparisons and is rejected here too
            if !(discount > 0.0 && discount <= 1.0) {
                return Err(RheaError::InvalidConfiguration(format!(
                    "discount ({}) must lie in (0, 1]",
                    discount
                )));
            }
        }

        Ok(())
    }

    /// Parse and validate a TOML configuration
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| {
            RheaError::InvalidConfiguration(format!("Failed to parse planner TOML: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }
}

/// Configuration for the multi-unit planner
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiUnitRheaConfig {
    #[serde(flatten)]
    pub search: SearchParams,
}

impl MultiUnitRheaConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horizon(mut self, horizon: usize) -> Self {
        self.search.horizon = horizon;
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.search.iterations = iterations;
        self
    }

    pub fn with_mutation_probability(mut self, p: f64) -> Self {
        self.search.mutation_probability = p;
        self
    }

    pub fn with_warm_start(mut self, warm_start: bool) -> Self {
        self.search.warm_start = warm_start;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.search.rng_seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.search.validate()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).map_err(|e| {
            RheaError::InvalidConfiguration(format!("Failed to parse planner TOML: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }
}
