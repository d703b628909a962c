//! Search loop
//!
//! This module drives a whole run: seed the initial generation, then for
//! each epoch evaluate every candidate through the cache, rank, record the
//! elite and derive the next generation, until the epoch budget is spent.
//! The all-time best pair is compared against a fixed baseline measured once
//! before the loop starts.

use std::cmp::Ordering;

use rand::Rng;
use tracing::{debug, info};

use crate::cache::EvaluationCache;
use crate::config::SearchConfig;
use crate::engine::PopulationEngine;
use crate::error::{ConfigError, SearchError, SearchResult};
use crate::evaluator::Evaluator;
use crate::population::candidate::Candidate;
use crate::population::generation::Generation;
use crate::report::{CandidateRow, EliteRow, SearchReport};

/// Drives epochs over generations and tracks the best-ever result
///
/// Construction validates the configuration; a loop never starts invalid.
/// Evaluation is sequential by design: each rating comes from an external
/// control-loop process whose measurement window is time-based, so
/// concurrent evaluations would contend for the clock under test. The
/// evaluation cache and the elite list are the only state carried across
/// epochs.
pub struct SearchLoop {
    config: SearchConfig,
    engine: PopulationEngine,
    cache: EvaluationCache,
    elite: Vec<Candidate>,
}

impl SearchLoop {
    /// Create a search loop from a configuration, validating it first
    pub fn new(config: SearchConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let engine = PopulationEngine::new(&config);
        let cache = EvaluationCache::new(config.reevaluate_duplicates);
        Ok(Self {
            config,
            engine,
            cache,
            elite: Vec::new(),
        })
    }

    /// The elite candidates retained so far, best first
    pub fn elite(&self) -> &[Candidate] {
        &self.elite
    }

    /// The run's evaluation cache
    pub fn cache(&self) -> &EvaluationCache {
        &self.cache
    }

    /// Build the initial generation
    ///
    /// Pre-seeded gain pairs fill the first slots; the remainder is padded
    /// with stability-aware or uniform draws.
    fn seed<R: Rng>(&self, rng: &mut R) -> Generation {
        let mut generation = Generation::with_capacity(self.config.population_size);
        for &gains in self
            .config
            .initial_gains
            .iter()
            .take(self.config.population_size)
        {
            generation.push(Candidate::new(gains));
        }
        while generation.len() < self.config.population_size {
            generation.push(Candidate::new(self.engine.random_gains(rng)));
        }
        generation
    }

    /// Run the search to completion
    ///
    /// Evaluator failure is fatal and aborts the run immediately; no partial
    /// generation is recorded as complete.
    pub fn run<E: Evaluator, R: Rng>(
        &mut self,
        evaluator: &mut E,
        rng: &mut R,
    ) -> SearchResult<SearchReport> {
        // Measure the reference settings once, before the loop.
        let mut baseline = Candidate::new(self.config.baseline.rounded());
        self.cache.score_of(&mut baseline, evaluator)?;
        info!(
            kp = baseline.gains().kp,
            ki = baseline.gains().ki,
            rating = baseline.rating_or_worst(),
            "baseline measured"
        );

        let mut generation = self.seed(rng);
        let mut best: Option<Candidate> = None;
        let mut candidate_rows = Vec::new();
        let mut elite_rows = Vec::new();

        for epoch in 0..self.config.epochs {
            debug!(epoch, size = generation.len(), "evaluating generation");

            // Evaluating: gains are rounded to canonical precision before
            // scoring, so the cache key and the reported row agree.
            for (index, candidate) in generation.iter_mut().enumerate() {
                let rounded = candidate.gains().rounded();
                candidate.mutate(rounded);
                let rating = self.cache.score_of(candidate, evaluator)?;
                candidate_rows.push(CandidateRow {
                    epoch,
                    candidate: index,
                    kp: rounded.kp,
                    ki: rounded.ki,
                    rating,
                });
            }

            // Ranking.
            debug_assert!(generation.all_rated());
            let ranked = self.engine.rank(&generation);

            let epoch_elite =
                self.engine
                    .extract_elite(&generation, &ranked, self.config.elite_size);
            self.elite.extend(epoch_elite);
            self.elite.sort_by(|a, b| {
                a.rating_or_worst()
                    .partial_cmp(&b.rating_or_worst())
                    .unwrap_or(Ordering::Equal)
            });
            self.elite.truncate(self.config.elite_size);

            if let Some(&top) = ranked.first() {
                let contender = generation[top].clone();
                if best.as_ref().map_or(true, |b| contender.is_better_than(b)) {
                    best = Some(contender);
                }
            }

            if let Some(best) = &best {
                let gains = best.gains();
                elite_rows.push(EliteRow {
                    epoch,
                    kp: gains.kp,
                    ki: gains.ki,
                    rating: best.rating_or_worst(),
                });
                info!(
                    epoch,
                    best_kp = gains.kp,
                    best_ki = gains.ki,
                    best_rating = best.rating_or_worst(),
                    "epoch complete"
                );
            }

            // Transitioning, unless the epoch budget is spent.
            if epoch + 1 < self.config.epochs {
                generation = self.engine.next_generation(&generation, &ranked, rng)?;
                if generation.is_empty() {
                    return Err(SearchError::EmptyGeneration);
                }
            }
        }

        let best = best.ok_or(SearchError::EmptyGeneration)?;
        let improvement_pct = best.rating_or_worst() * 100.0 / baseline.rating_or_worst();
        info!(
            best_kp = best.gains().kp,
            best_ki = best.gains().ki,
            improvement_pct,
            "search complete"
        );

        Ok(SearchReport {
            baseline,
            best,
            improvement_pct,
            epochs: self.config.epochs,
            evaluations: self.cache.misses(),
            candidate_rows,
            elite_rows,
        })
    }
}
