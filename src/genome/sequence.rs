//! Fixed-length gene sequences
//!
//! A plan never stores concrete actions. Each gene is a real value in [0, 1)
//! that is resolved against the branching factor of the state at the moment
//! it is consumed, so one plan stays meaningful when the number of legal
//! actions changes from step to step.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{ActionIndex, Gene};
use crate::genome::mutation::mutate_genes;

/// Map a gene onto an action index below `n_actions`
///
/// Clamped so a gene arbitrarily close to 1.0 can never produce `n_actions`.
/// Callers must not pass `n_actions == 0`; the result is 0 in that case.
pub fn decode(gene: Gene, n_actions: usize) -> ActionIndex {
    let index = (gene * n_actions as f64).floor();
    // Negative or NaN genes saturate to 0 in the float-to-int cast
    (index as ActionIndex).min(n_actions.saturating_sub(1))
}

/// Draw one fresh gene
pub fn random_gene<R: Rng + ?Sized>(rng: &mut R) -> Gene {
    rng.gen::<f64>()
}

/// Action plan for a single agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSequence(Vec<Gene>);

impl ActionSequence {
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self((0..len).map(|_| random_gene(rng)).collect())
    }

    pub fn from_genes(genes: Vec<Gene>) -> Self {
        Self(genes)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn genes(&self) -> &[Gene] {
        &self.0
    }

    pub fn first(&self) -> Option<Gene> {
        self.0.first().copied()
    }

    pub fn get(&self, step: usize) -> Option<Gene> {
        self.0.get(step).copied()
    }

    /// Copy with each gene independently resampled with probability `p`
    pub fn mutated<R: Rng + ?Sized>(&self, p: f64, rng: &mut R) -> Self {
        Self(mutate_genes(&self.0, p, rng))
    }

    /// Drop the head gene, append a fresh one, and return the head
    ///
    /// Length is preserved.
    pub fn shift<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Gene> {
        let head = self.first()?;
        self.0.rotate_left(1);
        if let Some(last) = self.0.last_mut() {
            *last = random_gene(rng);
        }
        Some(head)
    }
}

/// One action plan per controlled unit, advanced in lock-step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceArray(Vec<ActionSequence>);

impl SequenceArray {
    pub fn random<R: Rng + ?Sized>(n_units: usize, horizon: usize, rng: &mut R) -> Self {
        Self(
            (0..n_units)
                .map(|_| ActionSequence::random(horizon, rng))
                .collect(),
        )
    }

    pub fn from_sequences(sequences: Vec<ActionSequence>) -> Self {
        Self(sequences)
    }

    pub fn n_units(&self) -> usize {
        self.0.len()
    }

    /// Length shared by every unit's plan
    pub fn horizon(&self) -> usize {
        self.0.first().map_or(0, ActionSequence::len)
    }

    pub fn sequences(&self) -> &[ActionSequence] {
        &self.0
    }

    pub fn unit(&self, unit: usize) -> Option<&ActionSequence> {
        self.0.get(unit)
    }

    /// The `step`-th gene of every unit, in unit order
    pub fn column(&self, step: usize) -> Option<Vec<Gene>> {
        self.0.iter().map(|seq| seq.get(step)).collect()
    }

    /// Copy with exactly one randomly chosen unit's plan mutated
    ///
    /// Every other unit keeps its plan, so the fitness change of a candidate
    /// is attributable to a single unit.
    pub fn mutate_one_unit<R: Rng + ?Sized>(&self, p: f64, rng: &mut R) -> Self {
        let mut copy = self.clone();
        if copy.0.is_empty() {
            return copy;
        }
        let unit = rng.gen_range(0..copy.0.len());
        copy.0[unit] = copy.0[unit].mutated(p, rng);
        copy
    }

    /// Shift every unit's plan and return the head column
    pub fn shift<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Vec<Gene>> {
        self.0.iter_mut().map(|seq| seq.shift(rng)).collect()
    }
}
