//! Run records
//!
//! This module provides the record shapes the search loop produces each
//! epoch for downstream reporting and plotting collaborators: one row per
//! evaluated candidate and one elite row per epoch, plus the final report
//! for a whole run.

use serde::{Deserialize, Serialize};

use crate::population::candidate::Candidate;

/// CSV header for per-candidate rows.
pub const CANDIDATE_CSV_HEADER: &str = "epoch,candidate,k_p,k_i,rating";
/// CSV header for per-epoch elite rows.
pub const ELITE_CSV_HEADER: &str = "epoch,k_p,k_i,rating";

/// One evaluated candidate, in evaluation order within its epoch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CandidateRow {
    /// Epoch number, starting at 0
    pub epoch: usize,
    /// Candidate index within the epoch (evaluation order)
    pub candidate: usize,
    /// Proportional gain as evaluated
    pub kp: f64,
    /// Integral gain as evaluated
    pub ki: f64,
    /// Measured rating (lower is better)
    pub rating: f64,
}

impl CandidateRow {
    /// Render as a CSV line matching [`CANDIDATE_CSV_HEADER`]
    pub fn to_csv(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.epoch, self.candidate, self.kp, self.ki, self.rating
        )
    }
}

/// The best-known pair at the end of an epoch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EliteRow {
    /// Epoch number, starting at 0
    pub epoch: usize,
    /// Best-known proportional gain
    pub kp: f64,
    /// Best-known integral gain
    pub ki: f64,
    /// Best-known rating
    pub rating: f64,
}

impl EliteRow {
    /// Render as a CSV line matching [`ELITE_CSV_HEADER`]
    pub fn to_csv(&self) -> String {
        format!("{},{},{},{}", self.epoch, self.kp, self.ki, self.rating)
    }
}

/// The outcome of a complete search run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchReport {
    /// The baseline candidate, measured before the loop started
    pub baseline: Candidate,
    /// The all-time best candidate across all epochs
    pub best: Candidate,
    /// Best rating as a percentage of the baseline rating (lower is better)
    pub improvement_pct: f64,
    /// Number of epochs run
    pub epochs: usize,
    /// External evaluator invocations (cache misses)
    pub evaluations: usize,
    /// Every evaluated candidate, in epoch and evaluation order
    pub candidate_rows: Vec<CandidateRow>,
    /// One best-known row per epoch
    pub elite_rows: Vec<EliteRow>,
}

impl SearchReport {
    /// Render all candidate rows as CSV, header included
    pub fn candidates_csv(&self) -> String {
        let mut out = String::from(CANDIDATE_CSV_HEADER);
        for row in &self.candidate_rows {
            out.push('\n');
            out.push_str(&row.to_csv());
        }
        out
    }

    /// Render all elite rows as CSV, header included
    pub fn elite_csv(&self) -> String {
        let mut out = String::from(ELITE_CSV_HEADER);
        for row in &self.elite_rows {
            out.push('\n');
            out.push_str(&row.to_csv());
        }
        out
    }

    /// Serialize the whole report to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
