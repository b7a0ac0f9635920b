//! Time-to-event estimation.
//!
//! Two complementary modes. The closed-form estimate solves the easing
//! recurrence analytically for the manually driven surface; the windowed
//! countdown gives the scripted surface a theatrical integer countdown once
//! the smoothed likelihood enters its upper window.

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;

/// Estimated time remaining until the modeled threshold crossing.
///
/// `Now` and a numeric countdown are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "seconds", rename_all = "camelCase")]
pub enum Eta {
    /// No estimate published (e.g. cycle not running).
    None,
    /// The eased target never crosses the threshold: no event expected.
    NotExpected,
    /// The threshold has already been crossed.
    Now,
    /// Countdown in whole seconds.
    Seconds(u32),
}

/// Closed-form ETA until `value`, easing toward `target`, crosses
/// `threshold`.
///
/// The easing recurrence `v' = v + α·(t − v)` leaves a remaining gap of
/// `(t − v)·(1 − α)ⁿ` after n ticks, so the crossing tick is
/// `n = ln((t − thr)/(t − v)) / ln(1 − α)`.
pub fn convergence_eta(
    value: f64,
    target: f64,
    threshold: f64,
    ease_alpha: f64,
    tick_ms: u32,
) -> Eta {
    if !value.is_finite() || !target.is_finite() {
        return Eta::NotExpected;
    }
    if value >= threshold {
        return Eta::Now;
    }
    if target <= threshold {
        // The eased value converges below the threshold: unreachable.
        return Eta::NotExpected;
    }
    let ticks = ((target - threshold) / (target - value)).ln() / (1.0 - ease_alpha).ln();
    let secs = ticks * f64::from(tick_ms) / 1000.0;
    Eta::Seconds(secs.ceil().max(0.0) as u32)
}

/// Event produced by a countdown transition, for the notifier and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    Started,
    Cancelled,
    ReachedNow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running(u32),
    Now,
}

/// Windowed discrete countdown driven by the smoothed likelihood.
///
/// Entering the upper window starts a fixed-duration countdown exactly
/// once; it ticks down at 1 Hz, floored at 1, until the "now" threshold is
/// reached. Dropping back below the window's lower bound cancels it. At
/// most one countdown is active at a time; a start while one is running is
/// a no-op.
#[derive(Debug, Clone)]
pub struct Countdown {
    state: State,
}

impl Countdown {
    pub fn new() -> Self {
        Self { state: State::Idle }
    }

    /// Fold in the latest smoothed likelihood. Called once per simulation
    /// tick; returns the transition, if any.
    pub fn observe(&mut self, likelihood: f64, cfg: &SimConfig) -> Option<CountdownEvent> {
        match self.state {
            State::Idle => {
                if likelihood >= cfg.countdown_now {
                    self.state = State::Now;
                    Some(CountdownEvent::ReachedNow)
                } else if likelihood >= cfg.countdown_lower {
                    self.state = State::Running(cfg.countdown_start_secs);
                    Some(CountdownEvent::Started)
                } else {
                    None
                }
            }
            State::Running(_) => {
                if likelihood >= cfg.countdown_now {
                    self.state = State::Now;
                    Some(CountdownEvent::ReachedNow)
                } else if likelihood < cfg.countdown_lower {
                    self.state = State::Idle;
                    Some(CountdownEvent::Cancelled)
                } else {
                    None
                }
            }
            State::Now => {
                if likelihood < cfg.countdown_lower {
                    self.state = State::Idle;
                    Some(CountdownEvent::Cancelled)
                } else {
                    None
                }
            }
        }
    }

    /// 1 Hz decrement, floored at 1 until the "now" threshold is reached.
    pub fn second(&mut self) {
        if let State::Running(remaining) = self.state {
            self.state = State::Running(remaining.saturating_sub(1).max(1));
        }
    }

    /// True while a countdown timer should be armed.
    pub fn active(&self) -> bool {
        matches!(self.state, State::Running(_))
    }

    pub fn eta(&self) -> Eta {
        match self.state {
            State::Idle => Eta::None,
            State::Running(remaining) => Eta::Seconds(remaining),
            State::Now => Eta::Now,
        }
    }

    /// Tear down any active countdown (cycle reset).
    pub fn reset(&mut self) {
        self.state = State::Idle;
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new()
    }
}
