//! Scripted demo controller.
//!
//! Drives the rain input through an unattended ramp-up / peak-hold /
//! ramp-down cycle so the kiosk can run without an operator. Strictly one
//! phase is active at a time; every transition goes through the triggers
//! below and nothing else.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::SimConfig;
use crate::status::Status;

/// Phase of the scripted demo cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DemoPhase {
    Idle,
    RampUp,
    PeakHold,
    RampDown,
}

impl fmt::Display for DemoPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DemoPhase::Idle => "idle",
            DemoPhase::RampUp => "rampUp",
            DemoPhase::PeakHold => "peakHold",
            DemoPhase::RampDown => "rampDown",
        };
        write!(f, "{s}")
    }
}

/// Phase transition produced by a tick or command, for the engine to react
/// to (force ETA, clear ETA, reset alert flags).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseChange {
    Started,
    ToPeakHold,
    ToRampDown,
    ToIdle,
}

/// The demo state machine: `idle → rampUp → peakHold → rampDown → idle`.
#[derive(Debug, Clone)]
pub struct DemoScript {
    phase: DemoPhase,
    /// Ticks spent in the current phase.
    phase_ticks: u64,
    /// Consecutive ticks the classifier has reported DANGER.
    danger_dwell: u32,
}

impl DemoScript {
    pub fn new() -> Self {
        Self {
            phase: DemoPhase::Idle,
            phase_ticks: 0,
            danger_dwell: 0,
        }
    }

    pub fn phase(&self) -> DemoPhase {
        self.phase
    }

    /// Start (or restart) the demo cycle.
    ///
    /// Always performs a full reset of phase timers and dwell counters
    /// before entering ramp-up, so calling this while a cycle is already
    /// running is an idempotent restart.
    pub fn start(&mut self) -> PhaseChange {
        self.phase = DemoPhase::RampUp;
        self.phase_ticks = 0;
        self.danger_dwell = 0;
        PhaseChange::Started
    }

    /// Abort the cycle and return to idle immediately.
    pub fn stop(&mut self) -> Option<PhaseChange> {
        if self.phase == DemoPhase::Idle {
            return None;
        }
        self.phase = DemoPhase::Idle;
        self.phase_ticks = 0;
        self.danger_dwell = 0;
        Some(PhaseChange::ToIdle)
    }

    /// Track how long the classifier has continuously reported DANGER.
    pub fn note_status(&mut self, status: Status) {
        if status == Status::Danger {
            self.danger_dwell = self.danger_dwell.saturating_add(1);
        } else {
            self.danger_dwell = 0;
        }
    }

    /// Advance the script one tick, mutating `rain` when a phase drives it.
    ///
    /// `likelihood` and `near_baseline` are the values committed by the
    /// previous tick.
    pub fn tick(
        &mut self,
        rain: &mut f64,
        likelihood: f64,
        near_baseline: bool,
        cfg: &SimConfig,
    ) -> Option<PhaseChange> {
        match self.phase {
            DemoPhase::Idle => None,
            DemoPhase::RampUp => {
                self.phase_ticks += 1;
                *rain = (*rain + cfg.ramp_up_step).min(100.0);
                let peak_reached = likelihood >= cfg.likelihood_peak
                    || self.danger_dwell >= cfg.danger_dwell_ticks
                    || *rain >= 100.0
                    // Safety fallback so the demo cannot hang in ramp-up.
                    || self.phase_ticks >= cfg.ramp_up_max_ticks;
                if peak_reached {
                    self.phase = DemoPhase::PeakHold;
                    self.phase_ticks = 0;
                    *rain = 100.0;
                    Some(PhaseChange::ToPeakHold)
                } else {
                    None
                }
            }
            DemoPhase::PeakHold => {
                self.phase_ticks += 1;
                *rain = 100.0;
                if self.phase_ticks >= cfg.peak_hold_ticks {
                    self.phase = DemoPhase::RampDown;
                    self.phase_ticks = 0;
                    Some(PhaseChange::ToRampDown)
                } else {
                    None
                }
            }
            DemoPhase::RampDown => {
                self.phase_ticks += 1;
                *rain = (*rain - cfg.ramp_down_step).max(0.0);
                if *rain <= 0.0 && near_baseline {
                    self.phase = DemoPhase::Idle;
                    self.phase_ticks = 0;
                    self.danger_dwell = 0;
                    Some(PhaseChange::ToIdle)
                } else {
                    None
                }
            }
        }
    }
}

impl Default for DemoScript {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> SimConfig {
        SimConfig::default()
    }

    #[test]
    fn test_starts_idle() {
        assert_eq!(DemoScript::new().phase(), DemoPhase::Idle);
    }

    #[test]
    fn test_idle_never_moves_rain() {
        let mut script = DemoScript::new();
        let mut rain = 42.0;
        for _ in 0..10 {
            assert_eq!(script.tick(&mut rain, 0.0, true, &cfg()), None);
        }
        assert_eq!(rain, 42.0);
    }

    #[test]
    fn test_ramp_up_exits_on_rain_cap() {
        let cfg = cfg();
        let mut script = DemoScript::new();
        script.start();
        let mut rain = 0.0;
        let mut change = None;
        let mut ticks = 0;
        while change.is_none() {
            change = script.tick(&mut rain, 0.0, false, &cfg);
            ticks += 1;
            assert!(ticks <= 100, "ramp-up never exited");
        }
        assert_eq!(change, Some(PhaseChange::ToPeakHold));
        assert_eq!(script.phase(), DemoPhase::PeakHold);
        // Entry to peak-hold forces rain to the cap.
        assert_eq!(rain, 100.0);
        assert_eq!(ticks, (100.0 / cfg.ramp_up_step).ceil() as u32);
    }

    #[test]
    fn test_ramp_up_exits_early_on_likelihood_peak() {
        let cfg = cfg();
        let mut script = DemoScript::new();
        script.start();
        let mut rain = 0.0;
        let change = script.tick(&mut rain, cfg.likelihood_peak, false, &cfg);
        assert_eq!(change, Some(PhaseChange::ToPeakHold));
        assert_eq!(rain, 100.0);
    }

    #[test]
    fn test_ramp_up_exits_early_on_danger_dwell() {
        let cfg = cfg();
        let mut script = DemoScript::new();
        script.start();
        for _ in 0..cfg.danger_dwell_ticks {
            script.note_status(Status::Danger);
        }
        let mut rain = 0.0;
        let change = script.tick(&mut rain, 0.0, false, &cfg);
        assert_eq!(change, Some(PhaseChange::ToPeakHold));
    }

    #[test]
    fn test_danger_dwell_resets_on_non_danger() {
        let cfg = cfg();
        let mut script = DemoScript::new();
        script.start();
        for _ in 0..10 {
            script.note_status(Status::Danger);
        }
        script.note_status(Status::Warning);
        let mut rain = 0.0;
        assert_eq!(script.tick(&mut rain, 0.0, false, &cfg), None);
    }

    #[test]
    fn test_peak_hold_dwell_then_ramp_down() {
        let cfg = cfg();
        let mut script = DemoScript::new();
        script.start();
        let mut rain = 0.0;
        script.tick(&mut rain, cfg.likelihood_peak, false, &cfg);
        assert_eq!(script.phase(), DemoPhase::PeakHold);
        let mut change = None;
        for _ in 0..cfg.peak_hold_ticks {
            assert_eq!(change, None);
            change = script.tick(&mut rain, 100.0, false, &cfg);
        }
        assert_eq!(change, Some(PhaseChange::ToRampDown));
        assert_eq!(rain, 100.0);
    }

    #[test]
    fn test_ramp_down_waits_for_baseline() {
        let cfg = cfg();
        let mut script = DemoScript::new();
        script.start();
        let mut rain = 0.0;
        script.tick(&mut rain, cfg.likelihood_peak, false, &cfg);
        for _ in 0..cfg.peak_hold_ticks {
            script.tick(&mut rain, 100.0, false, &cfg);
        }
        assert_eq!(script.phase(), DemoPhase::RampDown);
        // Rain drains to zero but the sensors are still elevated: stay put.
        for _ in 0..100 {
            assert_eq!(script.tick(&mut rain, 50.0, false, &cfg), None);
        }
        assert_eq!(rain, 0.0);
        assert_eq!(script.phase(), DemoPhase::RampDown);
        // Sensors settle: next tick completes the cycle.
        assert_eq!(
            script.tick(&mut rain, 10.0, true, &cfg),
            Some(PhaseChange::ToIdle)
        );
        assert_eq!(script.phase(), DemoPhase::Idle);
        assert_eq!(rain, 0.0);
    }

    #[test]
    fn test_restart_is_idempotent() {
        let cfg = cfg();
        let mut script = DemoScript::new();
        script.start();
        let mut rain = 0.0;
        for _ in 0..5 {
            script.tick(&mut rain, 0.0, false, &cfg);
        }
        for _ in 0..4 {
            script.note_status(Status::Danger);
        }
        // Restart mid-cycle: timers and dwell fully reset.
        assert_eq!(script.start(), PhaseChange::Started);
        assert_eq!(script.phase(), DemoPhase::RampUp);
        assert_eq!(script.phase_ticks, 0);
        assert_eq!(script.danger_dwell, 0);
    }

    #[test]
    fn test_stop_from_idle_is_noop() {
        let mut script = DemoScript::new();
        assert_eq!(script.stop(), None);
    }

    #[test]
    fn test_ramp_up_safety_cap() {
        let mut cfg = cfg();
        // Make the rain step tiny so only the safety cap can fire.
        cfg.ramp_up_step = 0.001;
        let mut script = DemoScript::new();
        script.start();
        let mut rain = 0.0;
        let mut change = None;
        let mut ticks = 0u64;
        while change.is_none() {
            change = script.tick(&mut rain, 0.0, false, &cfg);
            ticks += 1;
        }
        assert_eq!(ticks, cfg.ramp_up_max_ticks);
        assert_eq!(change, Some(PhaseChange::ToPeakHold));
    }

    #[test]
    fn test_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&DemoPhase::PeakHold).unwrap(),
            "\"peakHold\""
        );
        assert_eq!(
            serde_json::to_string(&DemoPhase::Idle).unwrap(),
            "\"idle\""
        );
    }
}
