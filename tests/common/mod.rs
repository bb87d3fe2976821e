//! Test environments shared by the integration tests

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use rhea_planner::core::types::ActionIndex;
use rhea_planner::{GameModel, MultiUnitGameModel, Result};

/// Deterministic walk: action 1 scores a point, action 0 scores nothing
#[derive(Debug, Clone)]
pub struct CoinWalk {
    pub points: u32,
    pub moves: u32,
    pub limit: u32,
    pub branching: usize,
}

impl CoinWalk {
    pub fn new(limit: u32) -> Self {
        Self {
            points: 0,
            moves: 0,
            limit,
            branching: 2,
        }
    }

    pub fn with_branching(mut self, branching: usize) -> Self {
        self.branching = branching;
        self
    }
}

impl GameModel for CoinWalk {
    fn n_actions(&self) -> usize {
        self.branching
    }

    fn act(&mut self, action: ActionIndex) {
        assert!(action < self.branching, "action {} out of range", action);
        if action == self.branching - 1 {
            self.points += 1;
        }
        self.moves += 1;
    }

    fn score(&self) -> f64 {
        self.points as f64
    }

    fn is_terminal(&self) -> bool {
        self.moves >= self.limit
    }

    fn copy_state(&self) -> Result<Self> {
        Ok(self.clone())
    }
}

/// Branching factor grows by one every move, starting at 2
#[derive(Debug, Clone)]
pub struct WideningTree {
    pub depth: usize,
    pub total: usize,
}

impl WideningTree {
    pub fn new() -> Self {
        Self { depth: 0, total: 0 }
    }
}

impl GameModel for WideningTree {
    fn n_actions(&self) -> usize {
        self.depth + 2
    }

    fn act(&mut self, action: ActionIndex) {
        assert!(action < self.n_actions(), "action {} out of range", action);
        self.total += action;
        self.depth += 1;
    }

    fn score(&self) -> f64 {
        self.total as f64
    }

    fn is_terminal(&self) -> bool {
        false
    }

    fn copy_state(&self) -> Result<Self> {
        Ok(self.clone())
    }
}

/// Squad of units on a line; each unit scores by moving right.
/// Counts joint transitions through a handle shared by every copy.
#[derive(Debug, Clone)]
pub struct Squad {
    pub positions: Vec<i32>,
    pub action_counts: Vec<usize>,
    pub steps: u32,
    pub limit: u32,
    pub joint_transitions: Rc<Cell<usize>>,
    pub unit_moves: Rc<Cell<usize>>,
}

impl Squad {
    pub fn new(action_counts: Vec<usize>, limit: u32) -> Self {
        Self {
            positions: vec![0; action_counts.len()],
            action_counts,
            steps: 0,
            limit,
            joint_transitions: Rc::new(Cell::new(0)),
            unit_moves: Rc::new(Cell::new(0)),
        }
    }
}

impl GameModel for Squad {
    fn n_actions(&self) -> usize {
        self.action_counts.iter().product()
    }

    fn act(&mut self, action: ActionIndex) {
        let mut rest = action;
        let joint: Vec<ActionIndex> = self
            .action_counts
            .iter()
            .map(|&n| {
                let a = rest % n;
                rest /= n;
                a
            })
            .collect();
        self.combo_act(&joint);
    }

    fn score(&self) -> f64 {
        self.positions.iter().sum::<i32>() as f64
    }

    fn is_terminal(&self) -> bool {
        self.steps >= self.limit
    }

    fn copy_state(&self) -> Result<Self> {
        Ok(self.clone())
    }
}

impl MultiUnitGameModel for Squad {
    fn n_units(&self) -> usize {
        self.positions.len()
    }

    fn n_actions_unit(&self, unit: usize) -> usize {
        self.action_counts[unit]
    }

    fn combo_act(&mut self, actions: &[ActionIndex]) {
        assert_eq!(actions.len(), self.positions.len());
        self.joint_transitions.set(self.joint_transitions.get() + 1);
        for (unit, &action) in actions.iter().enumerate() {
            assert!(action < self.action_counts[unit]);
            // Highest action moves right, lowest moves left, others hold
            let delta = if action + 1 == self.action_counts[unit] {
                1
            } else if action == 0 {
                -1
            } else {
                0
            };
            self.positions[unit] += delta;
            self.unit_moves.set(self.unit_moves.get() + 1);
        }
        self.steps += 1;
    }
}
