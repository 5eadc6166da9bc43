//! Suitability scorer.
//!
//! Triangular kernel centred on the optimum, reaching zero `tolerance` units away on
//! either side and clamped from below by a small positive floor so that the
//! multiplicative growth product never collapses to exactly zero.

use crate::core::species::FactorEnvelope;

/// Lowest score any factor can contribute.
pub const SCORE_FLOOR: f64 = 0.01;

/// `max(floor, 1 - |value - optimum| / tolerance)` with the default floor.
///
/// `tolerance` must be positive; profiles enforce that at construction, so this is
/// not re-checked per call.
pub fn score(value: f64, optimum: f64, tolerance: f64) -> f64 {
    score_with_floor(value, optimum, tolerance, SCORE_FLOOR)
}

pub fn score_with_floor(value: f64, optimum: f64, tolerance: f64, floor: f64) -> f64 {
    let raw = 1.0 - (value - optimum).abs() / tolerance;
    raw.max(floor)
}

impl FactorEnvelope {
    pub fn score(&self, value: f64, floor: f64) -> f64 {
        score_with_floor(value, self.optimum(), self.tolerance(), floor)
    }
}
