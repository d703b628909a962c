//! Search configuration
//!
//! This module provides the immutable configuration surface for a search
//! run, validated once before the loop starts.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::gains::{GainBounds, GainPair};
use crate::stability::StabilityModel;

/// Smallest supported population.
pub const MIN_POPULATION_SIZE: usize = 8;

/// Configuration for a search run
///
/// Counts for random/inherited/replicated/elite members are non-negative by
/// type. `max_kp`/`max_ki` bound sampling and mutation clamping only while
/// no stability variant is active; an active variant supplies its own
/// rectangle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Stability variant constraining admissible gains
    pub stability: StabilityModel,
    /// Initial population size
    pub population_size: usize,
    /// Number of epochs to run
    pub epochs: usize,
    /// Max value considered for Kp (ignored when a stability variant is active)
    pub max_kp: f64,
    /// Max value considered for Ki (ignored when a stability variant is active)
    pub max_ki: f64,
    /// Randomly drawn candidates added to each new generation
    pub num_random: usize,
    /// Top-ranked candidates whose gain pairs are crossed
    pub num_inherited: usize,
    /// Top-ranked candidates replicated unchanged into the new generation
    pub num_replicated: usize,
    /// Perturbation magnitude applied to every new candidate (|coef| <= 1)
    pub mutation_coef: f64,
    /// Elite candidates retained across epochs
    pub elite_size: usize,
    /// Re-run repeated genotypes instead of reusing their rating
    pub reevaluate_duplicates: bool,
    /// Pre-seeded gain pairs for the initial population (count <= population size)
    pub initial_gains: Vec<GainPair>,
    /// Reference gains measured once before the loop starts
    pub baseline: GainPair,
    /// Per-step shrink fraction used by stability repair
    pub reduction_determinant: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            stability: StabilityModel::RealRooted,
            population_size: 8,
            epochs: 8,
            max_kp: 5.0,
            max_ki: 5.0,
            num_random: 2,
            num_inherited: 5,
            num_replicated: 4,
            mutation_coef: 1.0,
            elite_size: 1,
            reevaluate_duplicates: false,
            initial_gains: Vec::new(),
            baseline: GainPair::new(0.7, 0.3),
            reduction_determinant: 0.001,
        }
    }
}

impl SearchConfig {
    /// Validate every option against its constraint
    ///
    /// Called by [`SearchLoop::new`](crate::search::SearchLoop::new); a run
    /// never starts with an invalid configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.population_size < MIN_POPULATION_SIZE {
            return Err(ConfigError::PopulationTooSmall {
                min: MIN_POPULATION_SIZE,
                got: self.population_size,
            });
        }
        if self.epochs < 1 {
            return Err(ConfigError::NoEpochs);
        }
        if self.max_kp <= 0.0 {
            return Err(ConfigError::NonPositiveBound {
                axis: "k_p",
                got: self.max_kp,
            });
        }
        if self.max_ki <= 0.0 {
            return Err(ConfigError::NonPositiveBound {
                axis: "k_i",
                got: self.max_ki,
            });
        }
        if !(-1.0..=1.0).contains(&self.mutation_coef) {
            return Err(ConfigError::MutationCoefOutOfRange(self.mutation_coef));
        }
        if !(0.0 < self.reduction_determinant && self.reduction_determinant < 1.0) {
            return Err(ConfigError::ReductionDeterminantOutOfRange(
                self.reduction_determinant,
            ));
        }
        if self.initial_gains.len() > self.population_size {
            return Err(ConfigError::TooManySeeds {
                got: self.initial_gains.len(),
                population_size: self.population_size,
            });
        }
        for gains in self.initial_gains.iter().chain(Some(&self.baseline)) {
            if gains.kp < 0.0 || gains.ki < 0.0 {
                return Err(ConfigError::NegativeGain {
                    kp: gains.kp,
                    ki: gains.ki,
                });
            }
        }
        Ok(())
    }

    /// The effective sampling/clamping rectangle for this configuration
    ///
    /// An active stability variant supplies its own bounds; otherwise the
    /// configured `max_kp`/`max_ki` apply.
    pub fn effective_bounds(&self) -> GainBounds {
        self.stability
            .bounds()
            .unwrap_or_else(|| GainBounds::new(self.max_kp, self.max_ki))
    }
}
