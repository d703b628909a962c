//! Evaluation cache
//!
//! This module deduplicates fitness evaluations: each unique canonical
//! genotype is scored by the external evaluator at most once per run.

use std::collections::HashMap;

use tracing::trace;

use crate::error::EvaluationError;
use crate::evaluator::Evaluator;
use crate::gains::CanonicalGains;
use crate::population::candidate::Candidate;

/// A run-scoped cache of ratings keyed by canonical genotype
///
/// Owned by the search loop and passed explicitly, so the at-most-once
/// evaluation guarantee is testable in isolation. With
/// `reevaluate_duplicates` set, lookups are bypassed (every evaluation
/// re-runs) but the cache is still updated, keeping historical totals
/// consistent.
#[derive(Debug, Default)]
pub struct EvaluationCache {
    ratings: HashMap<CanonicalGains, f64>,
    reevaluate_duplicates: bool,
    hits: usize,
    misses: usize,
}

impl EvaluationCache {
    /// Create a new cache
    pub fn new(reevaluate_duplicates: bool) -> Self {
        Self {
            ratings: HashMap::new(),
            reevaluate_duplicates,
            hits: 0,
            misses: 0,
        }
    }

    /// Score a candidate, reusing a previous rating when possible
    ///
    /// The candidate's gains are canonicalized and looked up; on a hit the
    /// cached rating is set on the candidate without invoking the evaluator.
    /// On a miss the evaluator runs, the result is recorded under the
    /// canonical key and set on the candidate. Evaluator failure is fatal
    /// for the run and propagates unchanged.
    pub fn score_of<E: Evaluator>(
        &mut self,
        candidate: &mut Candidate,
        evaluator: &mut E,
    ) -> Result<f64, EvaluationError> {
        let gains = candidate.gains();
        let key = gains.canonical();

        if !self.reevaluate_duplicates {
            if let Some(&rating) = self.ratings.get(&key) {
                self.hits += 1;
                trace!(kp = gains.kp, ki = gains.ki, rating, "repeated genotype, reusing rating");
                candidate.set_rating(rating);
                return Ok(rating);
            }
        }

        self.misses += 1;
        let rating = evaluator.evaluate(gains)?;
        self.ratings.insert(key, rating);
        candidate.set_rating(rating);
        Ok(rating)
    }

    /// Look up the cached rating for a canonical genotype
    pub fn rating_for(&self, key: CanonicalGains) -> Option<f64> {
        self.ratings.get(&key).copied()
    }

    /// Number of unique genotypes scored so far
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// Check if no genotype has been scored yet
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Number of lookups answered from the cache
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// Number of external evaluator invocations
    pub fn misses(&self) -> usize {
        self.misses
    }
}
