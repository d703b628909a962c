//! Candidate and generation containers
//!
//! This module provides the candidate genotype/phenotype unit and the ordered
//! generation it lives in.

pub mod candidate;
pub mod generation;

pub use candidate::Candidate;
pub use generation::Generation;
