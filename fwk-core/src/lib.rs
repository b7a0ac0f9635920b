//! Simulation, scoring and classification engine for the flood-warning kiosk.
//!
//! This crate turns a single scalar control input (rain intensity, 0-100)
//! into time-evolving sensor readings, a smoothed flood-likelihood score, a
//! bucketed status, and a countdown-to-event estimate. It is the only part
//! of the kiosk with real state-machine and numerical-stability concerns;
//! rendering and cross-surface delivery live in `fwk-kiosk-ui` and
//! `fwk-sync`.
//!
//! # Architecture
//!
//! - All state lives in [`engine::Engine`]; every timer-driven entry point
//!   is an explicit method (`tick()` for the simulation cadence, `second()`
//!   for the 1 Hz countdown), so the crate is testable without any timers.
//! - Randomness is a capability: the engine owns a seeded `SmallRng` and
//!   passes it down, keeping every run reproducible from its seed.
//! - Nothing here reads a clock, spawns a thread, or panics on bad input;
//!   malformed values degrade to the last good value.

pub mod alerts;
pub mod config;
pub mod demo;
pub mod engine;
pub mod eta;
pub mod likelihood;
pub mod sensors;
pub mod snapshot;
pub mod status;

pub use config::SimConfig;
pub use demo::DemoPhase;
pub use engine::Engine;
pub use eta::Eta;
pub use status::Status;
