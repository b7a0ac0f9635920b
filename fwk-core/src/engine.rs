//! The control-surface engine.
//!
//! Owns all simulation state and exposes every timer-driven entry point as
//! an explicit method: `tick()` for the simulation cadence, `second()` for
//! the 1 Hz countdown. Surfaces arm the timers; the engine never does.
//!
//! Tick order (each tick is a read-modify-write over the previous tick's
//! committed values): demo script moves rain, sensors ease toward their
//! rain-derived targets, the likelihood is scored and smoothed, the status
//! is classified, the ETA is selected, and alert edges are detected.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use fwk_utils::num::clamp;

use crate::alerts::{Notifier, Toast};
use crate::config::{SimConfig, EASE_ALPHA, LEVEL, METRICS, SIM_TICK_MS};
use crate::demo::{DemoPhase, DemoScript, PhaseChange};
use crate::eta::{convergence_eta, Countdown, CountdownEvent, Eta};
use crate::likelihood::{raw_score, Likelihood};
use crate::sensors::{target, SensorBank};
use crate::snapshot::{SensorSnapshot, StatusSnapshot};
use crate::status::{classify, Status};

/// Simulation engine owned by the control surface.
pub struct Engine {
    cfg: SimConfig,
    rng: SmallRng,
    rain: f64,
    sensors: SensorBank,
    likelihood: Likelihood,
    status: Status,
    demo: DemoScript,
    countdown: Countdown,
    notifier: Notifier,
    eta: Eta,
    ticks: u64,
}

impl Engine {
    /// Build an engine resting at baseline. Runs are reproducible from the
    /// jitter seed.
    pub fn new(cfg: SimConfig, seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            rain: 0.0,
            sensors: SensorBank::at_baseline(),
            likelihood: Likelihood::new(),
            status: Status::Normal,
            demo: DemoScript::new(),
            countdown: Countdown::new(),
            notifier: Notifier::new(cfg.toast_ticks),
            eta: Eta::None,
            ticks: 0,
            cfg,
        }
    }

    pub fn with_defaults(seed: u64) -> Self {
        Self::new(SimConfig::default(), seed)
    }

    /// Operator input: set the rain intensity. Non-finite input keeps the
    /// previous value; everything else is clamped to [0, 100].
    pub fn set_rain(&mut self, pct: f64) {
        if pct.is_finite() {
            self.rain = clamp(pct, 0.0, 100.0);
        }
    }

    /// Start (or idempotently restart) the scripted demo cycle.
    ///
    /// One-shot alert flags, the countdown and all phase timers are fully
    /// reset before ramp-up begins.
    pub fn start_demo(&mut self) {
        self.demo.start();
        self.notifier.reset_flags();
        self.countdown.reset();
        self.eta = Eta::None;
        log::info!("demo script started (rain {:.0})", self.rain);
    }

    /// Abort the demo cycle and return to idle.
    pub fn stop_demo(&mut self) {
        if self.demo.stop().is_some() {
            self.countdown.reset();
            self.notifier.reset_flags();
            self.eta = Eta::None;
            log::info!("demo script stopped");
        }
    }

    /// Advance the simulation one tick.
    pub fn tick(&mut self) {
        let near = self.sensors.near_baseline(self.cfg.baseline_tolerance);
        let change = self
            .demo
            .tick(&mut self.rain, self.likelihood.value(), near, &self.cfg);

        self.sensors.tick(self.rain, &mut self.rng);
        let score = self.likelihood.update(raw_score(&self.sensors));
        let near = self.sensors.near_baseline(self.cfg.baseline_tolerance);

        let prev_status = self.status;
        self.status = classify(score, self.demo.phase(), near, &self.cfg);
        self.demo.note_status(self.status);

        if self.countdown.observe(score, &self.cfg) == Some(CountdownEvent::Started) {
            self.notifier.on_countdown_started();
        }
        if change == Some(PhaseChange::ToIdle) {
            // Cycle complete: tear down the countdown and re-arm the
            // one-shot alerts for the next run.
            self.countdown.reset();
            self.notifier.reset_flags();
        }
        self.eta = self.select_eta();

        self.notifier.on_status(prev_status, self.status);
        self.notifier.expire_tick();
        self.ticks += 1;

        if change.is_some() {
            log::info!(
                "demo phase -> {} (rain {:.0}, likelihood {:.1})",
                self.demo.phase(),
                self.rain,
                score
            );
        }
        log::debug!(
            "tick {}: rain {:.1} level {:.2} likelihood {:.1} status {}",
            self.ticks,
            self.rain,
            self.sensors.level(),
            score,
            self.status
        );
    }

    /// 1 Hz countdown decrement. A no-op unless a countdown is running.
    pub fn second(&mut self) {
        self.countdown.second();
        if self.countdown.active() {
            self.eta = self.countdown.eta();
        }
    }

    /// ETA selection: peak-hold forces "now"; an active countdown wins
    /// next; otherwise the closed-form convergence estimate on the river
    /// level against the flood stage.
    fn select_eta(&self) -> Eta {
        if self.demo.phase() == DemoPhase::PeakHold {
            return Eta::Now;
        }
        match self.countdown.eta() {
            Eta::None => convergence_eta(
                self.sensors.level(),
                target(&METRICS[LEVEL], self.rain),
                self.cfg.flood_stage,
                EASE_ALPHA,
                SIM_TICK_MS,
            ),
            eta => eta,
        }
    }

    pub fn dismiss_toast(&mut self, id: u64) {
        self.notifier.dismiss(id);
    }

    pub fn rain(&self) -> f64 {
        self.rain
    }

    pub fn likelihood(&self) -> f64 {
        self.likelihood.value()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn phase(&self) -> DemoPhase {
        self.demo.phase()
    }

    pub fn eta(&self) -> Eta {
        self.eta
    }

    pub fn sensors(&self) -> &SensorBank {
        &self.sensors
    }

    pub fn toasts(&self) -> &[Toast] {
        self.notifier.toasts()
    }

    /// True while the 1 Hz countdown timer should be armed.
    pub fn countdown_active(&self) -> bool {
        self.countdown.active()
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Immutable snapshot of the rain input and sensor readings.
    pub fn sensor_snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            rain: self.rain,
            level: self.sensors.level(),
            flow: self.sensors.flow(),
            turbidity: self.sensors.turbidity(),
            pressure: self.sensors.pressure(),
            discharge: self.sensors.discharge(),
            sediment: self.sensors.sediment(),
        }
    }

    /// Immutable snapshot of the derived state.
    pub fn status_snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            status: self.status,
            likelihood: self.likelihood.value(),
            eta: self.eta,
            phase: self.demo.phase(),
        }
    }
}
