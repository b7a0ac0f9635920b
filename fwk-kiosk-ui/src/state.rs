//! Application state managed via Dioxus context.
//!
//! `KioskState` bundles the reactive signals shared by the kiosk surfaces
//! into a single struct provided via `use_context_provider`. Child
//! components retrieve it with `use_context::<KioskState>()`.

use dioxus::prelude::*;
use fwk_core::snapshot::{DisplayState, SensorSnapshot, StatusSnapshot};

/// Shared reactive state for a kiosk surface.
#[derive(Clone, Copy)]
pub struct KioskState {
    /// Latest rain/sensor snapshot (own engine on the control surface,
    /// last received message on a display).
    pub sensors: Signal<SensorSnapshot>,
    /// Latest derived status snapshot.
    pub status: Signal<StatusSnapshot>,
    /// Which looped asset the display layer should show.
    pub display: Signal<DisplayState>,
    /// False until a display has received its first real message; while
    /// false the drift fallback animates the sensor values.
    pub connected: Signal<bool>,
}

impl KioskState {
    /// Create a new KioskState resting at baseline.
    pub fn new() -> Self {
        Self {
            sensors: Signal::new(SensorSnapshot::baseline()),
            status: Signal::new(StatusSnapshot::baseline()),
            display: Signal::new(DisplayState::Normal),
            connected: Signal::new(false),
        }
    }
}
