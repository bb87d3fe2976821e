//! Per-gene resampling mutation
//!
//! The only exploration mechanism: no crossover, no recombination.

use rand::Rng;

use crate::core::types::Gene;
use crate::genome::sequence::random_gene;

/// Resample each gene with probability `p`, keep it otherwise
pub fn mutate_genes<R: Rng + ?Sized>(genes: &[Gene], p: f64, rng: &mut R) -> Vec<Gene> {
    genes
        .iter()
        .map(|&gene| {
            if rng.gen::<f64>() < p {
                random_gene(rng)
            } else {
                gene
            }
        })
        .collect()
}
