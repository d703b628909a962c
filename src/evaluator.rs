//! Fitness evaluator contract
//!
//! This module defines the contract the search engine requires from the
//! external fitness collaborator: the component that runs the control loop
//! with a candidate's gains, harvests its measurement series and reduces it
//! to a scalar rating. How that rating is computed is out of scope here.

use crate::error::EvaluationError;
use crate::gains::GainPair;

/// External fitness evaluation trait
///
/// Implementations are expected to be deterministic enough for caching:
/// repeat calls with identical gains are treated as interchangeable. An
/// evaluation that cannot produce a rating (process launch failure, timeout,
/// malformed measurement data) fails with [`EvaluationError`]; retries, if
/// any, belong to the implementation, never to the caller.
///
/// Takes `&mut self` because evaluation typically drives an external process
/// and may carry state between runs.
pub trait Evaluator {
    /// Measure a rating for the given gains (lower is better)
    fn evaluate(&mut self, gains: GainPair) -> Result<f64, EvaluationError>;
}

/// A closure-based evaluator
///
/// Adapts any `FnMut(GainPair) -> Result<f64, EvaluationError>` for tests
/// and embedding.
pub struct FnEvaluator<F>
where
    F: FnMut(GainPair) -> Result<f64, EvaluationError>,
{
    f: F,
}

impl<F> FnEvaluator<F>
where
    F: FnMut(GainPair) -> Result<f64, EvaluationError>,
{
    /// Create a new closure-based evaluator
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Evaluator for FnEvaluator<F>
where
    F: FnMut(GainPair) -> Result<f64, EvaluationError>,
{
    fn evaluate(&mut self, gains: GainPair) -> Result<f64, EvaluationError> {
        (self.f)(gains)
    }
}
