//! Servo stability models
//!
//! This module classifies and repairs gain pairs against the feasibility
//! region derived from the servo's stability margins. Two constrained
//! variants exist, for a real-rooted and a complex-rooted characteristic
//! equation; `Off` disables the constraint entirely.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::StabilityError;
use crate::gains::{GainBounds, GainPair};

/// Upper Ki bound shared by both constrained variants.
const MAX_KI_STABLE: f64 = 4.0;
/// Upper Kp bound for the real-rooted variant.
const MAX_KP_REAL: f64 = 2.0;
/// Upper Kp bound for the complex-rooted variant.
const MAX_KP_COMPLEX: f64 = 1.0;
/// Step budget after which a repair loop is treated as an invariant violation.
const REPAIR_STEP_BUDGET: usize = 100_000;

/// The stability model constraining admissible gain pairs
///
/// Chosen once at startup; a pure predicate over (Kp, Ki) plus a
/// deterministic, terminating repair procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityModel {
    /// No feasibility constraint
    #[serde(rename = "off")]
    Off,
    /// Both servo poles real: stable iff 2Kp < 4 − Ki
    #[serde(rename = "real")]
    RealRooted,
    /// Complex-conjugate servo poles: stable iff (Kp + Ki)² < 4Ki
    #[serde(rename = "complex")]
    ComplexRooted,
}

impl StabilityModel {
    /// Whether this model constrains gains at all
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Off)
    }

    /// The variant's sampling rectangle, or None when unconstrained
    pub fn bounds(&self) -> Option<GainBounds> {
        match self {
            Self::Off => None,
            Self::RealRooted => Some(GainBounds::new(MAX_KP_REAL, MAX_KI_STABLE)),
            Self::ComplexRooted => Some(GainBounds::new(MAX_KP_COMPLEX, MAX_KI_STABLE)),
        }
    }

    /// Classify a gain pair against the feasibility region
    pub fn is_stable(&self, gains: GainPair) -> bool {
        let GainPair { kp, ki } = gains;
        match self {
            Self::Off => true,
            Self::RealRooted => {
                2.0 * kp < 4.0 - ki && (0.0..=MAX_KI_STABLE).contains(&ki) && (0.0..=MAX_KP_REAL).contains(&kp)
            }
            Self::ComplexRooted => {
                (kp + ki) * (kp + ki) < 4.0 * ki
                    && (0.0..=MAX_KI_STABLE).contains(&ki)
                    && (0.0..=MAX_KP_COMPLEX).contains(&kp)
            }
        }
    }

    /// Rejection-sample a stable gain pair from the variant rectangle
    ///
    /// Returns None for `Off`, which has no rectangle of its own; callers
    /// fall back to uniform draws over their configured bounds. Terminates
    /// almost surely: the feasible region has positive area inside the
    /// rectangle, and the strict inequality keeps the Ki = 0 edge from being
    /// accepted or looped on.
    pub fn draw_stable<R: Rng>(&self, rng: &mut R) -> Option<GainPair> {
        let bounds = self.bounds()?;
        loop {
            let gains = GainPair::sample(&bounds, rng);
            if self.is_stable(gains) {
                return Some(gains);
            }
        }
    }

    /// Redefine an infeasible gain pair to a stable one
    ///
    /// A stable input is returned unchanged. Otherwise both gains shrink
    /// toward a stable interior point by `reduction` per step, rounded to
    /// three decimals each step so the walk lands exactly on the boundary
    /// instead of approaching it forever.
    pub fn repair(&self, gains: GainPair, reduction: f64) -> Result<GainPair, StabilityError> {
        self.repair_traced(gains, reduction, |_| {})
    }

    /// [`repair`](Self::repair), reporting each rejected intermediate pair
    ///
    /// The observer is diagnostics only; it sees every pair the loop rejects,
    /// in order, and nothing when the input is already stable.
    pub fn repair_traced(
        &self,
        gains: GainPair,
        reduction: f64,
        mut observer: impl FnMut(GainPair),
    ) -> Result<GainPair, StabilityError> {
        if self.is_stable(gains) {
            return Ok(gains);
        }

        let GainPair { mut kp, mut ki } = gains;
        for _ in 0..REPAIR_STEP_BUDGET {
            observer(GainPair::new(kp, ki));
            match self {
                Self::Off => return Ok(gains),
                Self::RealRooted => {
                    ki *= 1.0 - reduction;
                    kp *= 1.0 - reduction;
                    if ki <= 0.0 {
                        ki += reduction;
                    }
                    if kp <= 0.0 {
                        kp += reduction;
                    }
                }
                Self::ComplexRooted => {
                    if ki < 1.0 {
                        ki += (1.0 - ki) * reduction;
                    }
                    if ki > 1.0 {
                        ki -= (ki - 1.0) * reduction;
                    }
                    if ki == 0.0 {
                        ki += reduction;
                    }
                    if kp == 0.0 {
                        kp += reduction;
                    }
                    kp -= reduction * kp;
                }
            }
            let repaired = GainPair::new(kp, ki).rounded();
            kp = repaired.kp;
            ki = repaired.ki;
            if self.is_stable(repaired) {
                return Ok(repaired);
            }
        }

        Err(StabilityError::RepairBudgetExhausted {
            kp: gains.kp,
            ki: gains.ki,
            steps: REPAIR_STEP_BUDGET,
        })
    }
}
