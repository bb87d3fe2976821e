//! Gene encoding of action plans and its mutation operator

pub mod mutation;
pub mod sequence;

pub use mutation::mutate_genes;
pub use sequence::{decode, random_gene, ActionSequence, SequenceArray};
