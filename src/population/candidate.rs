//! Candidate type
//!
//! This module provides the Candidate type that pairs a gain pair with its
//! rating.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::gains::GainPair;

/// A candidate in the population
///
/// Pairs a gain genotype with its measured rating (lower is better, None
/// until evaluated). A candidate is mutable only through [`mutate`]
/// (replaces the gains and clears the rating) and [`set_rating`]; its
/// identity for deduplication is the canonicalized gain pair, never object
/// identity.
///
/// [`mutate`]: Candidate::mutate
/// [`set_rating`]: Candidate::set_rating
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    gains: GainPair,
    rating: Option<f64>,
}

impl Candidate {
    /// Create a new unrated candidate
    pub fn new(gains: GainPair) -> Self {
        Self {
            gains,
            rating: None,
        }
    }

    /// Create a candidate with a known rating
    pub fn with_rating(gains: GainPair, rating: f64) -> Self {
        Self {
            gains,
            rating: Some(rating),
        }
    }

    /// The candidate's gain pair
    pub fn gains(&self) -> GainPair {
        self.gains
    }

    /// The candidate's rating, if evaluated
    pub fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Check if this candidate has been evaluated
    pub fn is_rated(&self) -> bool {
        self.rating.is_some()
    }

    /// The rating for ranking purposes; unrated candidates rank last
    pub fn rating_or_worst(&self) -> f64 {
        self.rating.unwrap_or(f64::INFINITY)
    }

    /// Replace the gains and clear the rating
    pub fn mutate(&mut self, new_gains: GainPair) {
        self.gains = new_gains;
        self.rating = None;
    }

    /// Record the rating from an evaluation
    pub fn set_rating(&mut self, rating: f64) {
        self.rating = Some(rating);
    }

    /// Check if this candidate outranks another (lower rating wins)
    pub fn is_better_than(&self, other: &Self) -> bool {
        match (self.rating, other.rating) {
            (Some(a), Some(b)) => a < b,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.rating_or_worst().partial_cmp(&other.rating_or_worst())
    }
}
