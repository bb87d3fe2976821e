//! Single-agent rolling horizon planner
//!
//! A (1+1) hill climber over one gene sequence. Each decision runs a fixed
//! number of mutate-evaluate-accept iterations, each against fresh copies of
//! the real state, then plays the head of the incumbent plan and shifts it
//! forward for the next call.

use rand_chacha::ChaCha8Rng;

use crate::agents::report::SearchReport;
use crate::agents::seeded_rng;
use crate::core::config::RheaConfig;
use crate::core::error::{Result, RheaError};
use crate::core::types::{ActionIndex, Fitness, PlannerPhase};
use crate::genome::{decode, ActionSequence};
use crate::model::{GameModel, SimplePlayer, StateTransitionListener};
use crate::rollout::{score_sequence, score_sequence_observed};
use crate::stats::clocked;

/// Result of the iteration loop, before the plan is shifted
struct SearchOutcome {
    incumbent: ActionSequence,
    accepted: usize,
    fitness_trace: Vec<Fitness>,
}

pub struct Rhea<M: GameModel> {
    config: RheaConfig,
    rng: ChaCha8Rng,
    current: Option<ActionSequence>,
    listener: Option<Box<dyn StateTransitionListener<M>>>,
    phase: PlannerPhase,
    last_report: Option<SearchReport>,
}

impl<M: GameModel> Rhea<M> {
    /// Create a planner seeded from `rng_seed`, or from entropy when unset
    pub fn new(config: RheaConfig) -> Result<Self> {
        let rng = seeded_rng(config.search.rng_seed);
        Self::with_rng(config, rng)
    }

    /// Create a planner drawing from an existing generator
    pub fn with_rng(config: RheaConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            current: None,
            listener: None,
            phase: PlannerPhase::Idle,
            last_report: None,
        })
    }

    /// Attach an observer that sees every transition of every rollout
    pub fn with_listener(mut self, listener: impl StateTransitionListener<M> + 'static) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }

    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }

    pub fn config(&self) -> &RheaConfig {
        &self.config
    }

    pub fn phase(&self) -> PlannerPhase {
        self.phase
    }

    /// Plan that the next decision will start from
    pub fn current_sequence(&self) -> Option<&ActionSequence> {
        self.current.as_ref()
    }

    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    /// Forget the stored plan, e.g. between episodes
    pub fn reset(&mut self) {
        self.current = None;
        self.last_report = None;
        self.phase = PlannerPhase::Idle;
    }

    /// Pick the action to play from `state`
    ///
    /// Fails with `TerminalState` on a terminal state and `NoLegalActions`
    /// when the state offers nothing to decode against. On any failure the
    /// planner returns to `Idle` and drops its last report; the stored plan
    /// is kept.
    pub fn get_action(&mut self, state: &M) -> Result<ActionIndex> {
        self.phase = PlannerPhase::Searching;
        match self.decide(state) {
            Ok(action) => {
                self.phase = PlannerPhase::Decided;
                Ok(action)
            }
            Err(e) => {
                self.phase = PlannerPhase::Idle;
                self.last_report = None;
                Err(e)
            }
        }
    }

    /// Search, then play and shift the head of the incumbent
    fn decide(&mut self, state: &M) -> Result<ActionIndex> {
        if state.is_terminal() {
            return Err(RheaError::TerminalState);
        }
        let n_actions = state.n_actions();
        if n_actions == 0 {
            return Err(RheaError::NoLegalActions { unit: None });
        }

        let (outcome, elapsed) = clocked("rhea search", || self.search(state));
        let SearchOutcome {
            mut incumbent,
            accepted,
            fitness_trace,
        } = outcome?;

        let head = incumbent.shift(&mut self.rng).ok_or_else(|| {
            RheaError::InvalidConfiguration("planner holds an empty plan".into())
        })?;
        let action = decode(head, n_actions);
        self.current = Some(incumbent);

        tracing::debug!(
            "RHEA chose action {} of {} after {} iterations ({} accepted, fitness {:?})",
            action,
            n_actions,
            self.config.search.iterations,
            accepted,
            fitness_trace.last()
        );

        self.last_report = Some(SearchReport::new(
            self.config.search.iterations,
            accepted,
            fitness_trace,
            vec![action],
            elapsed,
        ));
        Ok(action)
    }

    fn search(&mut self, state: &M) -> Result<SearchOutcome> {
        let search = &self.config.search;
        let mut incumbent = match self.current.as_ref().filter(|_| search.warm_start) {
            Some(seq) => seq.clone(),
            None => ActionSequence::random(search.horizon, &mut self.rng),
        };

        let iterations = search.iterations;
        let p_mut = search.mutation_probability;
        let mut accepted = 0;
        let mut fitness_trace = Vec::with_capacity(iterations);

        for _ in 0..iterations {
            let mutant = incumbent.mutated(p_mut, &mut self.rng);
            let incumbent_fitness = self.evaluate(state, &incumbent)?;
            let mutant_fitness = self.evaluate(state, &mutant)?;

            // Ties go to the mutant
            if mutant_fitness >= incumbent_fitness {
                incumbent = mutant;
                accepted += 1;
                fitness_trace.push(mutant_fitness);
            } else {
                fitness_trace.push(incumbent_fitness);
            }
        }

        Ok(SearchOutcome {
            incumbent,
            accepted,
            fitness_trace,
        })
    }

    fn evaluate(&mut self, state: &M, seq: &ActionSequence) -> Result<Fitness> {
        let copy = state.copy_state()?;
        let rollout = match self.listener.as_deref_mut() {
            Some(listener) => score_sequence_observed(copy, seq, self.config.discount, listener)?,
            None => score_sequence(copy, seq, self.config.discount)?,
        };
        Ok(rollout.fitness)
    }
}

impl<M: GameModel> SimplePlayer<M> for Rhea<M> {
    fn get_action(&mut self, state: &M) -> Result<ActionIndex> {
        Rhea::get_action(self, state)
    }
}
