//! Flood-likelihood scoring.
//!
//! The raw score is a weighted sum of normalized sensor deviations; the
//! published score is that raw score run through two smoothing stages
//! (exponential smoothing, then a hard per-tick step clamp). Both stages are
//! required: raw jitter crossing a bucket boundary would otherwise make the
//! status lamp flicker.

use crate::config::{METRICS, MAX_SCORE_STEP, SMOOTH_ALPHA};
use crate::sensors::SensorBank;

/// Instantaneous 0-100 risk score from the current sensor deviations.
///
/// Each metric's deviation from baseline is normalized against its maximum
/// deviation (|gain|), clamped to [0, 1], and combined with weights that sum
/// to 1.0.
pub fn raw_score(bank: &SensorBank) -> f64 {
    let mut score = 0.0;
    for (i, def) in METRICS.iter().enumerate() {
        let deviation = (bank.get(i) - def.baseline).abs() / def.gain.abs();
        score += def.weight * deviation.clamp(0.0, 1.0);
    }
    score * 100.0
}

/// Smoothed likelihood score, persisted across ticks.
#[derive(Debug, Clone)]
pub struct Likelihood {
    smoothed: f64,
}

impl Likelihood {
    pub fn new() -> Self {
        Self { smoothed: 0.0 }
    }

    /// Fold one raw score into the smoothed value.
    ///
    /// `smoothed += α·(raw − smoothed)`, then the per-tick delta is clamped
    /// to ±[`MAX_SCORE_STEP`] and the result to [0, 100].
    pub fn update(&mut self, raw: f64) -> f64 {
        let proposed = self.smoothed + SMOOTH_ALPHA * (raw - self.smoothed);
        let delta = (proposed - self.smoothed).clamp(-MAX_SCORE_STEP, MAX_SCORE_STEP);
        self.smoothed = (self.smoothed + delta).clamp(0.0, 100.0);
        self.smoothed
    }

    pub fn value(&self) -> f64 {
        self.smoothed
    }

    /// Reset to zero (demo restart).
    pub fn reset(&mut self) {
        self.smoothed = 0.0;
    }
}

impl Default for Likelihood {
    fn default() -> Self {
        Self::new()
    }
}
