//! Multi-unit rolling horizon planner
//!
//! Coordinate ascent over one gene sequence per controlled unit. Each
//! iteration mutates a single randomly chosen unit's plan and keeps the rest
//! fixed: in a combinatorial joint action space, mutating every unit at once
//! drowns the fitness signal the hill climber relies on.
//!
//! Rollouts are undiscounted and unobserved.

use std::marker::PhantomData;

use rand_chacha::ChaCha8Rng;

use crate::agents::report::SearchReport;
use crate::agents::seeded_rng;
use crate::core::config::MultiUnitRheaConfig;
use crate::core::error::{Result, RheaError};
use crate::core::types::{ActionIndex, Fitness, PlannerPhase};
use crate::genome::SequenceArray;
use crate::model::{MultiUnitGameModel, MultiUnitPlayer};
use crate::rollout::{decode_joint, score_sequence_array};
use crate::stats::clocked;

pub struct MultiUnitRhea<M: MultiUnitGameModel> {
    config: MultiUnitRheaConfig,
    rng: ChaCha8Rng,
    current: Option<SequenceArray>,
    phase: PlannerPhase,
    last_report: Option<SearchReport>,
    _model: PhantomData<fn(&M)>,
}

impl<M: MultiUnitGameModel> MultiUnitRhea<M> {
    pub fn new(config: MultiUnitRheaConfig) -> Result<Self> {
        let rng = seeded_rng(config.search.rng_seed);
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: MultiUnitRheaConfig, rng: ChaCha8Rng) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            current: None,
            phase: PlannerPhase::Idle,
            last_report: None,
            _model: PhantomData,
        })
    }

    pub fn config(&self) -> &MultiUnitRheaConfig {
        &self.config
    }

    pub fn phase(&self) -> PlannerPhase {
        self.phase
    }

    pub fn current_sequences(&self) -> Option<&SequenceArray> {
        self.current.as_ref()
    }

    pub fn last_report(&self) -> Option<&SearchReport> {
        self.last_report.as_ref()
    }

    pub fn reset(&mut self) {
        self.current = None;
        self.last_report = None;
        self.phase = PlannerPhase::Idle;
    }

    /// Pick one action per unit, in unit order
    ///
    /// On failure the planner returns to `Idle` and drops its last report.
    pub fn get_actions(&mut self, state: &M) -> Result<Vec<ActionIndex>> {
        self.phase = PlannerPhase::Searching;
        match self.decide(state) {
            Ok(actions) => {
                self.phase = PlannerPhase::Decided;
                Ok(actions)
            }
            Err(e) => {
                self.phase = PlannerPhase::Idle;
                self.last_report = None;
                Err(e)
            }
        }
    }

    fn decide(&mut self, state: &M) -> Result<Vec<ActionIndex>> {
        if state.is_terminal() {
            return Err(RheaError::TerminalState);
        }

        let (outcome, elapsed) = clocked("multi-unit rhea search", || self.search(state));
        let (mut incumbent, accepted, fitness_trace) = outcome?;

        let head = incumbent.shift(&mut self.rng).ok_or_else(|| {
            RheaError::InvalidConfiguration("planner holds an empty plan".into())
        })?;
        let actions = decode_joint(state, &head)?;
        self.current = Some(incumbent);

        tracing::debug!(
            "Multi-unit RHEA chose {:?} for {} units after {} iterations ({} accepted, fitness {:?})",
            actions,
            actions.len(),
            self.config.search.iterations,
            accepted,
            fitness_trace.last()
        );

        self.last_report = Some(SearchReport::new(
            self.config.search.iterations,
            accepted,
            fitness_trace,
            actions.clone(),
            elapsed,
        ));
        Ok(actions)
    }

    fn search(&mut self, state: &M) -> Result<(SequenceArray, usize, Vec<Fitness>)> {
        let search = &self.config.search;
        let n_units = state.n_units();

        let reusable = self
            .current
            .as_ref()
            .filter(|seqs| search.warm_start && seqs.n_units() == n_units);
        let mut incumbent = match reusable {
            Some(seqs) => seqs.clone(),
            None => {
                if let Some(stale) = &self.current {
                    if stale.n_units() != n_units {
                        tracing::debug!(
                            "Unit count changed from {} to {}, starting a fresh plan",
                            stale.n_units(),
                            n_units
                        );
                    }
                }
                SequenceArray::random(n_units, search.horizon, &mut self.rng)
            }
        };

        let iterations = search.iterations;
        let p_mut = search.mutation_probability;
        let mut accepted = 0;
        let mut fitness_trace = Vec::with_capacity(iterations);

        for _ in 0..iterations {
            let mutant = incumbent.mutate_one_unit(p_mut, &mut self.rng);
            let incumbent_fitness = score_sequence_array(state.copy_state()?, &incumbent)?.fitness;
            let mutant_fitness = score_sequence_array(state.copy_state()?, &mutant)?.fitness;

            // Ties go to the mutant
            if mutant_fitness >= incumbent_fitness {
                incumbent = mutant;
                accepted += 1;
                fitness_trace.push(mutant_fitness);
            } else {
                fitness_trace.push(incumbent_fitness);
            }
        }

        Ok((incumbent, accepted, fitness_trace))
    }
}

impl<M: MultiUnitGameModel> MultiUnitPlayer<M> for MultiUnitRhea<M> {
    fn get_actions(&mut self, state: &M) -> Result<Vec<ActionIndex>> {
        MultiUnitRhea::get_actions(self, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GameModel;

    /// Each unit adds its chosen action to a shared pool every step
    #[derive(Debug, Clone)]
    struct Pool {
        units: usize,
        branching: usize,
        total: usize,
        steps: usize,
        limit: usize,
        dead_unit: Option<usize>,
        copyable: bool,
    }

    impl Pool {
        fn new(units: usize, branching: usize) -> Self {
            Self {
                units,
                branching,
                total: 0,
                steps: 0,
                limit: usize::MAX,
                dead_unit: None,
                copyable: true,
            }
        }
    }

    impl GameModel for Pool {
        fn n_actions(&self) -> usize {
            self.branching.pow(self.units as u32)
        }

        fn act(&mut self, action: ActionIndex) {
            let mut rest = action;
            let joint: Vec<ActionIndex> = (0..self.units)
                .map(|_| {
                    let a = rest % self.branching;
                    rest /= self.branching;
                    a
                })
                .collect();
            self.combo_act(&joint);
        }

        fn score(&self) -> f64 {
            self.total as f64
        }

        fn is_terminal(&self) -> bool {
            self.steps >= self.limit
        }

        fn copy_state(&self) -> Result<Self> {
            if !self.copyable {
                return Err(RheaError::StateCopy("pool is pinned".into()));
            }
            Ok(self.clone())
        }
    }

    impl MultiUnitGameModel for Pool {
        fn n_units(&self) -> usize {
            self.units
        }

        fn n_actions_unit(&self, unit: usize) -> usize {
            if self.dead_unit == Some(unit) {
                0
            } else {
                self.branching
            }
        }

        fn combo_act(&mut self, actions: &[ActionIndex]) {
            self.total += actions.iter().sum::<usize>();
            self.steps += 1;
        }
    }

    fn config() -> MultiUnitRheaConfig {
        MultiUnitRheaConfig::new()
            .with_horizon(3)
            .with_iterations(5)
            .with_seed(42)
    }

    #[test]
    fn test_one_action_per_unit() {
        let mut planner = MultiUnitRhea::new(config()).unwrap();
        let actions = planner.get_actions(&Pool::new(2, 4)).unwrap();

        assert_eq!(actions.len(), 2);
        assert!(actions.iter().all(|&a| a < 4));

        let seqs = planner.current_sequences().unwrap();
        assert_eq!(seqs.n_units(), 2);
        assert_eq!(seqs.horizon(), 3);
    }

    #[test]
    fn test_terminal_state_rejected() {
        let mut planner = MultiUnitRhea::new(config()).unwrap();
        let mut state = Pool::new(2, 4);
        state.limit = 0;
        assert!(matches!(
            planner.get_actions(&state),
            Err(RheaError::TerminalState)
        ));
    }

    #[test]
    fn test_monotone_fitness_trace() {
        let mut planner = MultiUnitRhea::new(config().with_iterations(80)).unwrap();
        planner.get_actions(&Pool::new(3, 5)).unwrap();

        let report = planner.last_report().unwrap();
        assert_eq!(report.fitness_trace.len(), 80);
        assert!(report.fitness_trace.windows(2).all(|w| w[1] >= w[0]));
    }

    #[test]
    fn test_unit_count_change_restarts_plan() {
        let mut planner = MultiUnitRhea::new(config()).unwrap();
        planner.get_actions(&Pool::new(2, 4)).unwrap();

        let actions = planner.get_actions(&Pool::new(3, 4)).unwrap();

        assert_eq!(actions.len(), 3);
        assert_eq!(planner.current_sequences().unwrap().n_units(), 3);
    }

    #[test]
    fn test_warm_start_carries_tail() {
        let mut planner = MultiUnitRhea::new(config().with_iterations(0)).unwrap();
        let state = Pool::new(2, 4);
        planner.get_actions(&state).unwrap();
        let expected: Vec<ActionIndex> = planner
            .current_sequences()
            .unwrap()
            .column(0)
            .unwrap()
            .into_iter()
            .map(|g| crate::genome::decode(g, 4))
            .collect();

        assert_eq!(planner.get_actions(&state).unwrap(), expected);
    }

    #[test]
    fn test_search_saturates_every_unit() {
        let mut planner = MultiUnitRhea::new(config().with_iterations(300)).unwrap();
        assert_eq!(planner.get_actions(&Pool::new(2, 2)).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_dead_unit_fails_inside_rollout() {
        let mut planner = MultiUnitRhea::new(config()).unwrap();
        let mut state = Pool::new(2, 4);
        state.dead_unit = Some(1);

        assert!(matches!(
            planner.get_actions(&state),
            Err(RheaError::NoLegalActions { unit: Some(1) })
        ));
        assert_eq!(planner.phase(), PlannerPhase::Idle);
        assert!(planner.last_report().is_none());
    }

    #[test]
    fn test_dead_unit_fails_at_decision_without_search() {
        let mut planner = MultiUnitRhea::new(config().with_iterations(0)).unwrap();
        let mut state = Pool::new(2, 4);
        state.dead_unit = Some(1);

        assert!(matches!(
            planner.get_actions(&state),
            Err(RheaError::NoLegalActions { unit: Some(1) })
        ));
        assert_eq!(planner.phase(), PlannerPhase::Idle);
        assert!(planner.current_sequences().is_none());
    }

    #[test]
    fn test_copy_failure_propagates() {
        let mut planner = MultiUnitRhea::new(config()).unwrap();
        let mut state = Pool::new(2, 4);
        state.copyable = false;

        assert!(matches!(
            planner.get_actions(&state),
            Err(RheaError::StateCopy(_))
        ));
        assert_eq!(planner.phase(), PlannerPhase::Idle);
    }

    #[test]
    fn test_failure_after_success_drops_report() {
        let mut planner = MultiUnitRhea::new(config()).unwrap();
        planner.get_actions(&Pool::new(2, 4)).unwrap();
        assert_eq!(planner.phase(), PlannerPhase::Decided);
        assert!(planner.last_report().is_some());

        let mut state = Pool::new(2, 4);
        state.limit = 0;
        assert!(planner.get_actions(&state).is_err());

        assert_eq!(planner.phase(), PlannerPhase::Idle);
        assert!(planner.last_report().is_none());
        assert_eq!(planner.current_sequences().unwrap().n_units(), 2);
    }
}
