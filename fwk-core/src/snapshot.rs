//! Serializable snapshots and command payloads.
//!
//! These are the `data` payloads carried by the sync messages. Passive
//! displays render solely from the last snapshot received; incoming
//! payloads are coerced field-by-field so a malformed or partial message
//! degrades to "hold last good value" instead of propagating NaN into the
//! render path.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use fwk_utils::num::finite_in_range_or;

use crate::config::{
    DISCHARGE_FACTOR, FLOW, LEVEL, METRICS, PRESSURE, SEDIMENT_FACTOR, TURBIDITY,
};
use crate::demo::DemoPhase;
use crate::eta::Eta;
use crate::status::Status;

/// Message kind for the rain/sensor snapshot.
pub const KIND_SENSORS: &str = "sensor-snapshot";
/// Message kind for the status/likelihood/ETA snapshot.
pub const KIND_STATUS: &str = "status-snapshot";
/// Message kind for the operator set-rain command.
pub const KIND_SET_RAIN: &str = "set-rain";
/// Message kind for the display trigger-state command.
pub const KIND_DISPLAY_STATE: &str = "display-state";
/// Message kind for the run/stop named-script command.
pub const KIND_SCRIPT: &str = "script";

/// Which looped asset a passive display should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisplayState {
    Normal,
    Rain,
}

/// Run/stop command for a named demo script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScriptCommand {
    pub name: String,
    pub running: bool,
}

/// Rain input and the current sensor readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorSnapshot {
    pub rain: f64,
    pub level: f64,
    pub flow: f64,
    pub turbidity: f64,
    pub pressure: f64,
    pub discharge: f64,
    pub sediment: f64,
}

impl SensorSnapshot {
    /// Everything resting at baseline; the hard-coded fallback a display
    /// uses until its first real message arrives.
    pub fn baseline() -> Self {
        Self {
            rain: 0.0,
            level: METRICS[LEVEL].baseline,
            flow: METRICS[FLOW].baseline,
            turbidity: METRICS[TURBIDITY].baseline,
            pressure: METRICS[PRESSURE].baseline,
            discharge: METRICS[FLOW].baseline * METRICS[LEVEL].baseline * DISCHARGE_FACTOR,
            sediment: METRICS[TURBIDITY].baseline * METRICS[FLOW].baseline * SEDIMENT_FACTOR,
        }
    }

    /// Merge an incoming payload over this snapshot, field by field.
    ///
    /// Missing, non-finite or out-of-range fields keep the previous value.
    pub fn merged_with(&self, incoming: &Value) -> Self {
        let field = |name: &str, lo: f64, hi: f64, prev: f64| -> f64 {
            match incoming.get(name).and_then(Value::as_f64) {
                Some(v) => finite_in_range_or(v, lo, hi, prev),
                None => prev,
            }
        };
        Self {
            rain: field("rain", 0.0, 100.0, self.rain),
            level: field("level", 0.0, 1.0e3, self.level),
            flow: field("flow", 0.0, 1.0e5, self.flow),
            turbidity: field("turbidity", 0.0, 1.0e5, self.turbidity),
            pressure: field("pressure", 0.0, 1.0e4, self.pressure),
            discharge: field("discharge", 0.0, 1.0e9, self.discharge),
            sediment: field("sediment", 0.0, 1.0e9, self.sediment),
        }
    }

    /// Slow autonomous wander applied to the fallback snapshot so an
    /// unconnected display does not look frozen.
    pub fn drift_step(&mut self, tick: u64) {
        let phase = tick as f64 / 40.0;
        self.level = METRICS[LEVEL].baseline * (1.0 + 0.01 * phase.sin());
        self.flow = METRICS[FLOW].baseline * (1.0 + 0.02 * (phase * 0.7).sin());
        self.turbidity = METRICS[TURBIDITY].baseline * (1.0 + 0.02 * (phase * 1.3).cos());
        self.pressure = METRICS[PRESSURE].baseline * (1.0 + 0.001 * phase.cos());
        self.discharge = self.flow * self.level * DISCHARGE_FACTOR;
        self.sediment = self.turbidity * self.flow * SEDIMENT_FACTOR;
    }
}

/// Derived state: status lamp, likelihood, ETA and demo phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub status: Status,
    pub likelihood: f64,
    pub eta: Eta,
    pub phase: DemoPhase,
}

impl StatusSnapshot {
    /// Quiet defaults for a display that has not heard from the control
    /// surface yet.
    pub fn baseline() -> Self {
        Self {
            status: Status::Normal,
            likelihood: 0.0,
            eta: Eta::None,
            phase: DemoPhase::Idle,
        }
    }

    /// Merge an incoming payload over this snapshot, field by field.
    pub fn merged_with(&self, incoming: &Value) -> Self {
        let status = incoming
            .get("status")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(self.status);
        let likelihood = match incoming.get("likelihood").and_then(Value::as_f64) {
            Some(v) => finite_in_range_or(v, 0.0, 100.0, self.likelihood),
            None => self.likelihood,
        };
        let eta = incoming
            .get("eta")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(self.eta);
        let phase = incoming
            .get("phase")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or(self.phase);
        Self {
            status,
            likelihood,
            eta,
            phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sensor_merge_takes_valid_fields() {
        let prev = SensorSnapshot::baseline();
        let next = prev.merged_with(&json!({ "rain": 55.0, "level": 3.2 }));
        assert_eq!(next.rain, 55.0);
        assert_eq!(next.level, 3.2);
        // Untouched fields hold the previous values.
        assert_eq!(next.flow, prev.flow);
        assert_eq!(next.pressure, prev.pressure);
    }

    #[test]
    fn test_sensor_merge_rejects_non_finite_and_out_of_range() {
        let prev = SensorSnapshot::baseline();
        let next = prev.merged_with(&json!({
            "rain": 250.0,
            "level": "wet",
            "flow": Value::Null,
            "pressure": -3.0,
        }));
        assert_eq!(next, prev);
    }

    #[test]
    fn test_sensor_merge_of_nan_via_string_payload() {
        // serde_json cannot represent NaN, but a missing conversion still
        // exercises the fallback path.
        let prev = SensorSnapshot::baseline();
        let next = prev.merged_with(&json!({ "level": {} }));
        assert_eq!(next.level, prev.level);
    }

    #[test]
    fn test_status_merge() {
        let prev = StatusSnapshot::baseline();
        let next = prev.merged_with(&json!({
            "status": "WARNING",
            "likelihood": 72.5,
            "eta": { "state": "seconds", "seconds": 14 },
            "phase": "rampUp",
        }));
        assert_eq!(next.status, Status::Warning);
        assert_eq!(next.likelihood, 72.5);
        assert_eq!(next.eta, Eta::Seconds(14));
        assert_eq!(next.phase, DemoPhase::RampUp);
    }

    #[test]
    fn test_status_merge_keeps_previous_on_garbage() {
        let prev = StatusSnapshot {
            status: Status::Danger,
            likelihood: 88.0,
            eta: Eta::Now,
            phase: DemoPhase::PeakHold,
        };
        let next = prev.merged_with(&json!({
            "status": "MELTDOWN",
            "likelihood": 1e9,
            "eta": "soonish",
            "phase": 7,
        }));
        assert_eq!(next, prev);
    }

    #[test]
    fn test_snapshot_round_trip() {
        let snap = StatusSnapshot {
            status: Status::Subsiding,
            likelihood: 64.2,
            eta: Eta::Seconds(9),
            phase: DemoPhase::RampDown,
        };
        let json = serde_json::to_value(&snap).unwrap();
        let back: StatusSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn test_drift_wanders_but_stays_near_baseline() {
        let mut snap = SensorSnapshot::baseline();
        for tick in 0..500 {
            snap.drift_step(tick);
            assert!((snap.level - METRICS[0].baseline).abs() <= 0.03 * METRICS[0].baseline);
            assert!((snap.flow - METRICS[1].baseline).abs() <= 0.03 * METRICS[1].baseline);
        }
    }
}
