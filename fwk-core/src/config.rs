//! Tunable parameters for the simulation engine.
//!
//! Everything an exhibit operator might want to retune lives here: metric
//! response curves, smoothing factors, status cut points, and the demo
//! script timings. The cut points are configuration, not behavior — the
//! classifier only requires that they stay contiguous and exhaustive.

/// Simulation tick period. All per-tick step constants are calibrated
/// against this cadence.
pub const SIM_TICK_MS: u32 = 500;

/// Per-tick fraction of remaining distance covered when easing a sensor
/// value toward its target.
pub const EASE_ALPHA: f64 = 0.18;

/// Bounded jitter amplitude, as a fraction of the current target magnitude.
/// Kept well inside the near-baseline tolerance so a settled bank cannot
/// jitter itself out of the SUBSIDING exit condition.
pub const JITTER_FRACTION: f64 = 0.01;

/// Exponential smoothing factor for the likelihood score.
pub const SMOOTH_ALPHA: f64 = 0.25;

/// Maximum absolute likelihood change per tick, after smoothing. Keeps the
/// status lamp from flickering when jitter crosses a bucket boundary.
pub const MAX_SCORE_STEP: f64 = 4.0;

/// Response curve and scoring weight for one eased metric.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub name: &'static str,
    /// Value at rain 0.
    pub baseline: f64,
    /// Added to baseline at rain 100 (may be negative).
    pub gain: f64,
    /// Power-law exponent applied to rain/100; distinct exponents stagger
    /// the onset of each metric.
    pub exponent: f64,
    /// Weight in the likelihood score. Weights sum to 1.0.
    pub weight: f64,
}

/// The four eased metrics, in bank order.
pub const METRICS: [MetricDef; 4] = [
    MetricDef {
        name: "level",
        baseline: 1.2,
        gain: 4.8,
        exponent: 0.8,
        weight: 0.40,
    },
    MetricDef {
        name: "flow",
        baseline: 35.0,
        gain: 385.0,
        exponent: 1.15,
        weight: 0.30,
    },
    MetricDef {
        name: "turbidity",
        baseline: 8.0,
        gain: 212.0,
        exponent: 1.6,
        weight: 0.20,
    },
    MetricDef {
        name: "pressure",
        baseline: 101.3,
        gain: -4.3,
        exponent: 0.9,
        weight: 0.10,
    },
];

/// Index of the river level metric in [`METRICS`] (drives the closed-form
/// ETA against the flood stage).
pub const LEVEL: usize = 0;
pub const FLOW: usize = 1;
pub const TURBIDITY: usize = 2;
pub const PRESSURE: usize = 3;

/// Discharge is derived as `flow * level * DISCHARGE_FACTOR`.
pub const DISCHARGE_FACTOR: f64 = 0.85;

/// Sediment load is derived as `turbidity * flow * SEDIMENT_FACTOR`.
pub const SEDIMENT_FACTOR: f64 = 0.002;

/// Runtime-tunable thresholds and demo script timings.
#[derive(Debug, Clone, Copy)]
pub struct SimConfig {
    /// Rounded score below this is NORMAL.
    pub watch_threshold: i64,
    /// Rounded score at or above this is WARNING.
    pub warning_threshold: i64,
    /// Rounded score at or above this is DANGER.
    pub danger_threshold: i64,
    /// A metric counts as "near baseline" when within this fraction of its
    /// baseline magnitude.
    pub baseline_tolerance: f64,

    /// Rain added per tick while ramping up.
    pub ramp_up_step: f64,
    /// Rain removed per tick while ramping down.
    pub ramp_down_step: f64,
    /// Ticks spent holding rain at 100 before ramping down.
    pub peak_hold_ticks: u64,
    /// Smoothed likelihood at which ramp-up ends early.
    pub likelihood_peak: f64,
    /// Consecutive DANGER ticks that end ramp-up early.
    pub danger_dwell_ticks: u32,
    /// Safety cap on ramp-up length so the demo cannot hang.
    pub ramp_up_max_ticks: u64,

    /// River level at which a flood event is considered underway (m).
    pub flood_stage: f64,
    /// Smoothed likelihood that starts the windowed countdown.
    pub countdown_lower: f64,
    /// Smoothed likelihood at which the countdown collapses to "now".
    pub countdown_now: f64,
    /// Countdown start value, in seconds.
    pub countdown_start_secs: u32,

    /// Toast lifetime, in simulation ticks.
    pub toast_ticks: u32,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            watch_threshold: 40,
            warning_threshold: 70,
            danger_threshold: 80,
            baseline_tolerance: 0.05,

            ramp_up_step: 4.0,
            ramp_down_step: 3.0,
            peak_hold_ticks: 24,
            likelihood_peak: 97.0,
            danger_dwell_ticks: 6,
            ramp_up_max_ticks: 120,

            flood_stage: 4.5,
            countdown_lower: 95.0,
            countdown_now: 99.0,
            countdown_start_secs: 20,

            toast_ticks: 12,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        let total: f64 = METRICS.iter().map(|m| m.weight).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_buckets_are_ordered() {
        let cfg = SimConfig::default();
        assert!(cfg.watch_threshold < cfg.warning_threshold);
        assert!(cfg.warning_threshold < cfg.danger_threshold);
    }

    #[test]
    fn test_flood_stage_reachable_at_full_rain() {
        let level = &METRICS[LEVEL];
        let cfg = SimConfig::default();
        assert!(level.baseline + level.gain > cfg.flood_stage);
    }
}
