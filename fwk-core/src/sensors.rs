//! Synthetic sensor bank.
//!
//! Each eased metric chases a rain-derived target with exponential
//! convergence plus bounded jitter; the two derived metrics (discharge,
//! sediment load) are recomputed from the eased values every tick rather
//! than eased independently. The model is intentionally a plausible-looking
//! synthetic function, not a hydrological predictor.

use rand::Rng;

use crate::config::{
    MetricDef, DISCHARGE_FACTOR, EASE_ALPHA, FLOW, JITTER_FRACTION, LEVEL, METRICS, PRESSURE,
    SEDIMENT_FACTOR, TURBIDITY,
};

/// Target value for a metric at the given rain intensity.
///
/// Power-law ease of `rain/100`; distinct exponents per metric stagger the
/// onset so the displays do not move in lockstep.
pub fn target(def: &MetricDef, rain: f64) -> f64 {
    let x = (rain / 100.0).clamp(0.0, 1.0);
    def.baseline + def.gain * x.powf(def.exponent)
}

/// Current values of the four eased metrics, in [`METRICS`] order.
#[derive(Debug, Clone)]
pub struct SensorBank {
    values: [f64; METRICS.len()],
}

impl SensorBank {
    /// A bank resting at baseline (rain 0, no history).
    pub fn at_baseline() -> Self {
        let mut values = [0.0; METRICS.len()];
        for (v, def) in values.iter_mut().zip(METRICS.iter()) {
            *v = def.baseline;
        }
        Self { values }
    }

    /// Advance every eased metric one tick toward its rain-derived target.
    ///
    /// Values move a fixed fraction of the remaining distance, so they never
    /// jump; jitter is bounded to a fraction of the target magnitude.
    pub fn tick(&mut self, rain: f64, rng: &mut impl Rng) {
        for (v, def) in self.values.iter_mut().zip(METRICS.iter()) {
            let t = target(def, rain);
            *v += EASE_ALPHA * (t - *v);
            let jitter = (rng.gen::<f64>() * 2.0 - 1.0) * JITTER_FRACTION * t.abs();
            *v += jitter;
        }
    }

    pub fn level(&self) -> f64 {
        self.values[LEVEL]
    }

    pub fn flow(&self) -> f64 {
        self.values[FLOW]
    }

    pub fn turbidity(&self) -> f64 {
        self.values[TURBIDITY]
    }

    pub fn pressure(&self) -> f64 {
        self.values[PRESSURE]
    }

    /// Derived: channel discharge from the settled level and flow.
    pub fn discharge(&self) -> f64 {
        self.flow() * self.level() * DISCHARGE_FACTOR
    }

    /// Derived: suspended sediment load from turbidity and flow.
    pub fn sediment(&self) -> f64 {
        self.turbidity() * self.flow() * SEDIMENT_FACTOR
    }

    /// Value of the metric at `index` in [`METRICS`] order.
    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// True when every eased metric sits within `tolerance` (relative to its
    /// baseline magnitude) of baseline. Gates the SUBSIDING override and the
    /// demo script's return to idle.
    pub fn near_baseline(&self, tolerance: f64) -> bool {
        self.values.iter().zip(METRICS.iter()).all(|(v, def)| {
            (v - def.baseline).abs() <= tolerance * def.baseline.abs()
        })
    }

    /// Named (metric, value) pairs for snapshot export.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        METRICS
            .iter()
            .zip(self.values.iter())
            .map(|(def, v)| (def.name, *v))
    }
}
