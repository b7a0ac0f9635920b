//! Status bucket classification.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SimConfig;
use crate::demo::DemoPhase;

/// Discrete status shown on the kiosk lamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Normal,
    Watch,
    Warning,
    Danger,
    Subsiding,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Status::Normal => "NORMAL",
            Status::Watch => "WATCH",
            Status::Warning => "WARNING",
            Status::Danger => "DANGER",
            Status::Subsiding => "SUBSIDING",
        };
        write!(f, "{s}")
    }
}

/// Map a smoothed likelihood score to a status.
///
/// Pure function of (rounded score, phase, near-baseline flag). While the
/// demo script is ramping down and the sensors have not yet settled back to
/// baseline, SUBSIDING overrides the bucket result — even when the rounded
/// score still reads DANGER. The override lifts as soon as every tracked
/// metric is back within tolerance.
pub fn classify(score: f64, phase: DemoPhase, near_baseline: bool, cfg: &SimConfig) -> Status {
    if phase == DemoPhase::RampDown && !near_baseline {
        return Status::Subsiding;
    }
    let rounded = score.round() as i64;
    if rounded >= cfg.danger_threshold {
        Status::Danger
    } else if rounded >= cfg.warning_threshold {
        Status::Warning
    } else if rounded >= cfg.watch_threshold {
        Status::Watch
    } else {
        Status::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn test_buckets_are_contiguous_and_exhaustive() {
        let cfg = cfg();
        let mut prev = classify(0.0, DemoPhase::Idle, true, &cfg);
        for score in 0..=100 {
            let s = classify(score as f64, DemoPhase::Idle, true, &cfg);
            // Severity never decreases as the score rises.
            let rank = |s: Status| match s {
                Status::Normal => 0,
                Status::Watch => 1,
                Status::Warning => 2,
                Status::Danger => 3,
                Status::Subsiding => unreachable!("no override in idle"),
            };
            assert!(rank(s) >= rank(prev));
            prev = s;
        }
    }

    #[test]
    fn test_cut_points() {
        let cfg = cfg();
        assert_eq!(classify(39.4, DemoPhase::Idle, true, &cfg), Status::Normal);
        assert_eq!(classify(39.6, DemoPhase::Idle, true, &cfg), Status::Watch);
        assert_eq!(classify(69.0, DemoPhase::Idle, true, &cfg), Status::Watch);
        assert_eq!(classify(70.0, DemoPhase::Idle, true, &cfg), Status::Warning);
        assert_eq!(classify(79.0, DemoPhase::Idle, true, &cfg), Status::Warning);
        assert_eq!(classify(80.0, DemoPhase::Idle, true, &cfg), Status::Danger);
        assert_eq!(classify(100.0, DemoPhase::Idle, true, &cfg), Status::Danger);
    }

    #[test]
    fn test_subsiding_overrides_bucket_during_ramp_down() {
        let cfg = cfg();
        // Score still reads DANGER, but we are ramping down and not yet
        // settled: SUBSIDING wins.
        assert_eq!(
            classify(92.0, DemoPhase::RampDown, false, &cfg),
            Status::Subsiding
        );
        // Once every metric is near baseline the override lifts.
        assert_eq!(
            classify(12.0, DemoPhase::RampDown, true, &cfg),
            Status::Normal
        );
    }

    #[test]
    fn test_no_override_outside_ramp_down() {
        let cfg = cfg();
        assert_eq!(
            classify(92.0, DemoPhase::PeakHold, false, &cfg),
            Status::Danger
        );
        assert_eq!(classify(92.0, DemoPhase::Idle, false, &cfg), Status::Danger);
    }

    #[test]
    fn test_deterministic() {
        let cfg = cfg();
        for _ in 0..3 {
            assert_eq!(
                classify(75.2, DemoPhase::RampUp, false, &cfg),
                Status::Warning
            );
        }
    }

    #[test]
    fn test_serializes_uppercase() {
        let json = serde_json::to_string(&Status::Subsiding).unwrap();
        assert_eq!(json, "\"SUBSIDING\"");
    }
}
