//! Population engine
//!
//! This module owns one generation's ranking, elitism and the full
//! generation-transition algorithm: crossover, replication, random
//! injection and mutation, with stability repair applied to every
//! infeasible product.

use std::cmp::Ordering;

use rand::Rng;
use tracing::debug;

use crate::config::SearchConfig;
use crate::error::StabilityError;
use crate::gains::{GainBounds, GainPair};
use crate::population::candidate::Candidate;
use crate::population::generation::Generation;
use crate::stability::StabilityModel;

/// Computes the next generation from a ranked one
///
/// The engine is configured once per run. Stage counts clamp to the current
/// generation size, so a degenerate generation shrinks a stage rather than
/// failing; producing zero crossover offspring (`num_inherited < 2`) is
/// valid.
#[derive(Debug, Clone)]
pub struct PopulationEngine {
    model: StabilityModel,
    bounds: GainBounds,
    num_inherited: usize,
    num_replicated: usize,
    num_random: usize,
    mutation_coef: f64,
    reduction: f64,
}

impl PopulationEngine {
    /// Create an engine from a validated configuration
    pub fn new(config: &SearchConfig) -> Self {
        Self {
            model: config.stability,
            bounds: config.effective_bounds(),
            num_inherited: config.num_inherited,
            num_replicated: config.num_replicated,
            num_random: config.num_random,
            mutation_coef: config.mutation_coef,
            reduction: config.reduction_determinant,
        }
    }

    /// Rank candidate indices ascending by rating
    ///
    /// The sort is stable: equal ratings keep their original relative order.
    /// Unrated candidates rank last.
    pub fn rank(&self, generation: &Generation) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..generation.len()).collect();
        indices.sort_by(|&a, &b| {
            generation[a]
                .rating_or_worst()
                .partial_cmp(&generation[b].rating_or_worst())
                .unwrap_or(Ordering::Equal)
        });
        indices
    }

    /// Extract the epoch's elite: the best `elite_size` candidates
    ///
    /// Returned sorted ascending by rating and truncated to exactly
    /// `elite_size` entries (fewer when the generation is smaller). The
    /// first entry is the epoch's best pair.
    pub fn extract_elite(
        &self,
        generation: &Generation,
        ranked: &[usize],
        elite_size: usize,
    ) -> Vec<Candidate> {
        let mut elite: Vec<Candidate> = ranked
            .iter()
            .take(elite_size)
            .map(|&i| generation[i].clone())
            .collect();
        elite.sort_by(|a, b| {
            a.rating_or_worst()
                .partial_cmp(&b.rating_or_worst())
                .unwrap_or(Ordering::Equal)
        });
        elite.truncate(elite_size);
        elite
    }

    /// Draw a fresh gain pair: stability-aware when a variant is active,
    /// uniform over the effective bounds otherwise
    pub fn random_gains<R: Rng>(&self, rng: &mut R) -> GainPair {
        match self.model.draw_stable(rng) {
            Some(gains) => gains,
            None => GainPair::sample(&self.bounds, rng),
        }
    }

    /// Produce the next generation from a ranked one
    ///
    /// Four stages, in order: crossover over all unordered pairs of the top
    /// `num_inherited` candidates (two gain-swapped offspring per pair),
    /// replication of the top `num_replicated`, injection of `num_random`
    /// fresh draws, then an unconditional mutation of every candidate built
    /// so far. Any infeasible product is repaired, never discarded, so the
    /// resulting size is exactly
    /// `2 * C(num_inherited, 2) + num_replicated + num_random`.
    /// The engine does not hold generation size constant across epochs.
    pub fn next_generation<R: Rng>(
        &self,
        generation: &Generation,
        ranked: &[usize],
        rng: &mut R,
    ) -> Result<Generation, StabilityError> {
        let inherited = self.num_inherited.min(ranked.len());
        let replicated = self.num_replicated.min(ranked.len());
        let capacity = inherited * inherited.saturating_sub(1) + replicated + self.num_random;
        let mut next = Generation::with_capacity(capacity);

        // Crossover: swap Kp/Ki across every unordered pair of top parents.
        for x in 0..inherited {
            for y in (x + 1)..inherited {
                let a = generation[ranked[x]].gains();
                let b = generation[ranked[y]].gains();
                next.push(Candidate::new(self.feasible(GainPair::new(a.kp, b.ki))?));
                next.push(Candidate::new(self.feasible(GainPair::new(b.kp, a.ki))?));
            }
        }
        debug!(crossed = next.len(), "crossover complete");

        // Replication: top parents carried over with gains unchanged. The
        // cache short-circuits their re-scoring unless re-evaluation is on.
        for &i in ranked.iter().take(replicated) {
            next.push(Candidate::new(generation[i].gains()));
        }

        // Random injection.
        for _ in 0..self.num_random {
            next.push(Candidate::new(self.random_gains(rng)));
        }

        // Mutation: every candidate from the stages above, replicated and
        // injected ones included. Independent draws per axis per candidate.
        for candidate in next.iter_mut() {
            let gains = candidate.gains();
            let kp = (gains.kp + rng.gen_range(-1.0..1.0) * self.mutation_coef)
                .clamp(0.0, self.bounds.max_kp);
            let ki = (gains.ki + rng.gen_range(-1.0..1.0) * self.mutation_coef)
                .clamp(0.0, self.bounds.max_ki);
            let mutated = self.feasible(GainPair::new(kp, ki))?;
            candidate.mutate(mutated);
        }
        debug!(size = next.len(), "generation transition complete");

        Ok(next)
    }

    /// Pass a gain pair through stability repair when needed
    fn feasible(&self, gains: GainPair) -> Result<GainPair, StabilityError> {
        if self.model.is_stable(gains) {
            Ok(gains)
        } else {
            self.model.repair(gains, self.reduction)
        }
    }
}
