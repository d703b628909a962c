//! Gain pair and bounds types
//!
//! This module provides the (Kp, Ki) gain pair being tuned, its canonical
//! cache-key form, and the rectangular sampling bounds.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Decimal places gains are rounded to before evaluation and caching.
pub const GAIN_DECIMALS: i32 = 3;

/// Round a value to [`GAIN_DECIMALS`] decimal places.
pub(crate) fn round_gain(value: f64) -> f64 {
    let scale = 10f64.powi(GAIN_DECIMALS);
    (value * scale).round() / scale
}

/// A proportional/integral gain pair
///
/// Both gains are non-negative reals; no inherent upper bound beyond what the
/// active configuration or stability model imposes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainPair {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
}

impl GainPair {
    /// Create a new gain pair
    pub fn new(kp: f64, ki: f64) -> Self {
        Self { kp, ki }
    }

    /// Round both gains to the canonical precision
    pub fn rounded(&self) -> Self {
        Self {
            kp: round_gain(self.kp),
            ki: round_gain(self.ki),
        }
    }

    /// The canonical genotype used as a deduplication key
    pub fn canonical(&self) -> CanonicalGains {
        CanonicalGains::from(*self)
    }

    /// Draw a uniform gain pair from the given bounds
    pub fn sample<R: Rng>(bounds: &GainBounds, rng: &mut R) -> Self {
        Self {
            kp: rng.gen_range(0.0..bounds.max_kp),
            ki: rng.gen_range(0.0..bounds.max_ki),
        }
    }
}

impl From<(f64, f64)> for GainPair {
    fn from((kp, ki): (f64, f64)) -> Self {
        Self::new(kp, ki)
    }
}

/// A gain pair rounded to the canonical precision, held as integer
/// thousandths so it can be hashed and compared exactly
///
/// Two candidates with equal canonical gains are the same genotype for
/// deduplication purposes, regardless of object identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalGains {
    kp_thousandths: i64,
    ki_thousandths: i64,
}

impl CanonicalGains {
    /// Recover the proportional gain
    pub fn kp(&self) -> f64 {
        self.kp_thousandths as f64 / 1000.0
    }

    /// Recover the integral gain
    pub fn ki(&self) -> f64 {
        self.ki_thousandths as f64 / 1000.0
    }
}

impl From<GainPair> for CanonicalGains {
    fn from(gains: GainPair) -> Self {
        Self {
            kp_thousandths: (gains.kp * 1000.0).round() as i64,
            ki_thousandths: (gains.ki * 1000.0).round() as i64,
        }
    }
}

/// Rectangular sampling and clamping bounds for gain pairs
///
/// Lower bounds are fixed at zero; only the upper corner varies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GainBounds {
    /// Upper bound for Kp (inclusive)
    pub max_kp: f64,
    /// Upper bound for Ki (inclusive)
    pub max_ki: f64,
}

impl GainBounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if either bound is not strictly positive
    pub fn new(max_kp: f64, max_ki: f64) -> Self {
        assert!(
            max_kp > 0.0 && max_ki > 0.0,
            "Invalid bounds: max_kp ({}) and max_ki ({}) must be > 0",
            max_kp,
            max_ki
        );
        Self { max_kp, max_ki }
    }

    /// Check if a gain pair lies within bounds
    pub fn contains(&self, gains: GainPair) -> bool {
        (0.0..=self.max_kp).contains(&gains.kp) && (0.0..=self.max_ki).contains(&gains.ki)
    }

    /// Clamp a gain pair into bounds
    pub fn clamp(&self, gains: GainPair) -> GainPair {
        GainPair {
            kp: gains.kp.clamp(0.0, self.max_kp),
            ki: gains.ki.clamp(0.0, self.max_ki),
        }
    }
}
