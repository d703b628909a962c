//! Error types for servo-evo
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for configuration validation
///
/// Produced by [`SearchConfig::validate`](crate::config::SearchConfig::validate)
/// before a run starts; a run never begins with an invalid configuration.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Population size below the supported minimum
    #[error("Population size must be at least {min}, got {got}")]
    PopulationTooSmall { min: usize, got: usize },

    /// Epoch count must allow at least one evaluation pass
    #[error("Epoch count must be at least 1")]
    NoEpochs,

    /// Sampling bound must be strictly positive
    #[error("Max {axis} must be greater than 0, got {got}")]
    NonPositiveBound { axis: &'static str, got: f64 },

    /// Mutation coefficient magnitude above 1
    #[error("Mutation coefficient magnitude must not exceed 1, got {0}")]
    MutationCoefOutOfRange(f64),

    /// Repair step granularity outside (0, 1)
    #[error("Reduction determinant must lie in (0, 1), got {0}")]
    ReductionDeterminantOutOfRange(f64),

    /// More pre-seeded gain pairs than population slots
    #[error("{got} initial gain pairs exceed the population size {population_size}")]
    TooManySeeds { got: usize, population_size: usize },

    /// Gains are non-negative by definition
    #[error("Gain pair ({kp}, {ki}) has a negative component")]
    NegativeGain { kp: f64, ki: f64 },
}

/// Error type for external fitness evaluation
///
/// The evaluator collaborator launches a control-loop process and reduces its
/// measurement series to a scalar rating; any failure along that path is
/// fatal for the run (no retry at this layer).
#[derive(Debug, Error)]
pub enum EvaluationError {
    /// The control-loop process could not be started
    #[error("Failed to launch control-loop process: {0}")]
    Launch(String),

    /// The control-loop process started but did not complete cleanly
    #[error("Control-loop process failed: {0}")]
    Process(String),

    /// The measurement output could not be reduced to a rating
    #[error("Malformed measurement data: {0}")]
    MalformedResult(String),

    /// The evaluation did not finish within the caller-supplied timeout
    #[error("Evaluation timed out after {0} seconds")]
    Timeout(u64),

    /// IO error while harvesting measurement output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type for stability repair
///
/// Repair is guaranteed to terminate for well-formed inputs; exhausting the
/// step budget is an internal invariant violation, kept distinct from
/// evaluation failures.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StabilityError {
    /// The repair loop ran out of steps without reaching the stable region
    #[error("Repair of ({kp}, {ki}) exceeded {steps} steps without reaching the stable region")]
    RepairBudgetExhausted { kp: f64, ki: f64, steps: usize },
}

/// Top-level error type for search runs
#[derive(Debug, Error)]
pub enum SearchError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Fitness evaluation failed
    #[error("Evaluation failed: {0}")]
    Evaluation(#[from] EvaluationError),

    /// Stability repair failed
    #[error("Stability repair failed: {0}")]
    Stability(#[from] StabilityError),

    /// A generation transition produced no candidates
    #[error("Empty generation")]
    EmptyGeneration,
}

/// Result type alias for search operations
pub type SearchResult<T> = Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::PopulationTooSmall { min: 8, got: 3 };
        assert_eq!(err.to_string(), "Population size must be at least 8, got 3");

        let err = ConfigError::NonPositiveBound {
            axis: "k_p",
            got: 0.0,
        };
        assert_eq!(err.to_string(), "Max k_p must be greater than 0, got 0");

        let err = ConfigError::MutationCoefOutOfRange(1.5);
        assert_eq!(
            err.to_string(),
            "Mutation coefficient magnitude must not exceed 1, got 1.5"
        );
    }

    #[test]
    fn test_evaluation_error_display() {
        let err = EvaluationError::Launch("no such interface".to_string());
        assert_eq!(
            err.to_string(),
            "Failed to launch control-loop process: no such interface"
        );

        let err = EvaluationError::MalformedResult("empty offset series".to_string());
        assert_eq!(
            err.to_string(),
            "Malformed measurement data: empty offset series"
        );
    }

    #[test]
    fn test_stability_error_display() {
        let err = StabilityError::RepairBudgetExhausted {
            kp: 1.5,
            ki: 3.0,
            steps: 100,
        };
        assert_eq!(
            err.to_string(),
            "Repair of (1.5, 3) exceeded 100 steps without reaching the stable region"
        );
    }

    #[test]
    fn test_search_error_from_config_error() {
        let config_err = ConfigError::NoEpochs;
        let search_err: SearchError = config_err.into();
        assert!(matches!(search_err, SearchError::Config(_)));
    }

    #[test]
    fn test_search_error_from_evaluation_error() {
        let eval_err = EvaluationError::Process("exit status 1".to_string());
        let search_err: SearchError = eval_err.into();
        assert!(matches!(search_err, SearchError::Evaluation(_)));
    }
}
