//! # servo-evo
//!
//! Constrained genetic search for PI clock-servo gains.
//!
//! This library tunes the proportional/integral gain pair (Kp, Ki) of a PI
//! control loop by evolutionary search, while keeping every candidate inside
//! a closed-form stability region derived from the servo's stability
//! margins.
//!
//! ## Core Concepts
//!
//! - **Lower is better**: ratings are error measurements; the search
//!   minimizes them.
//! - **Stability first**: infeasible candidates produced by crossover or
//!   mutation are repaired onto the stable region, never discarded.
//! - **At-most-once evaluation**: each unique canonical genotype is scored
//!   by the external evaluator at most once per run.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use servo_evo::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let mut evaluator = FnEvaluator::new(|gains: GainPair| {
//!     // Launch the control loop with these gains and reduce its
//!     // measurement series to a scalar error here.
//!     Ok((gains.kp - 0.4).abs() + (gains.ki - 0.9).abs())
//! });
//!
//! let config = SearchConfig {
//!     stability: StabilityModel::ComplexRooted,
//!     epochs: 8,
//!     ..Default::default()
//! };
//! let report = SearchLoop::new(config)?.run(&mut evaluator, &mut rng)?;
//! println!("best gains: {:?}", report.best.gains());
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod evaluator;
pub mod gains;
pub mod population;
pub mod report;
pub mod search;
pub mod stability;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cache::EvaluationCache;
    pub use crate::config::SearchConfig;
    pub use crate::engine::PopulationEngine;
    pub use crate::error::*;
    pub use crate::evaluator::{Evaluator, FnEvaluator};
    pub use crate::gains::{CanonicalGains, GainBounds, GainPair};
    pub use crate::population::{Candidate, Generation};
    pub use crate::report::{CandidateRow, EliteRow, SearchReport};
    pub use crate::search::SearchLoop;
    pub use crate::stability::StabilityModel;
}
