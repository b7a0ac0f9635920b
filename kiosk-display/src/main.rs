//! Passive full-screen display.
//!
//! Owns no simulation state: it renders the last sensor and status
//! snapshots received over the transport, treating each message as the new
//! authoritative state (latest write wins — duplicates and stale snapshots
//! are silently absorbed by the field-by-field merge). Until the first real
//! message arrives a hard-coded drift fallback animates the readings so the
//! screen does not look frozen.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dioxus::prelude::*;

use fwk_core::config::SIM_TICK_MS;
use fwk_core::snapshot::{KIND_DISPLAY_STATE, KIND_SENSORS, KIND_STATUS};
use fwk_kiosk_ui::components::{
    AssetLoop, EtaReadout, LikelihoodGauge, SensorGrid, StatusLamp,
};
use fwk_kiosk_ui::sched::WebScheduler;
use fwk_kiosk_ui::state::KioskState;
use fwk_sync::{SyncMessage, Transport};
use fwk_utils::sched::{Scheduler, TimerGuard};

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("kiosk-display-root"))
        .launch(App);
}

#[cfg(target_arch = "wasm32")]
fn make_transport() -> Rc<dyn Transport> {
    Rc::new(fwk_sync::web::WebTransport::new())
}

#[cfg(not(target_arch = "wasm32"))]
fn make_transport() -> Rc<dyn Transport> {
    Rc::new(fwk_sync::local::LocalHub::new().endpoint())
}

#[component]
fn App() -> Element {
    let state = use_context_provider(KioskState::new);

    let transport = use_hook(make_transport);
    let scheduler = use_hook(WebScheduler::new);
    let drift_timer = use_hook(|| Rc::new(RefCell::new(Option::<TimerGuard>::None)));

    use_effect({
        let transport = transport.clone();
        let drift_timer = drift_timer.clone();
        move || {
            // Drift fallback: animate the baseline readings until the first
            // real message arrives, then release the timer.
            let drift_tick = Rc::new(Cell::new(0u64));
            {
                let drift_tick = drift_tick.clone();
                *drift_timer.borrow_mut() = Some(scheduler.every(
                    SIM_TICK_MS,
                    Box::new(move || {
                        let mut state = state;
                        let tick = drift_tick.get() + 1;
                        drift_tick.set(tick);
                        let mut sensors = state.sensors.peek().clone();
                        sensors.drift_step(tick);
                        state.sensors.set(sensors);
                    }),
                ));
            }

            let on_live = {
                let drift_timer = drift_timer.clone();
                move || {
                    let mut state = state;
                    if !*state.connected.peek() {
                        state.connected.set(true);
                        // First real message: the fallback animation stops.
                        *drift_timer.borrow_mut() = None;
                        log::info!("control surface connected");
                    }
                }
            };

            let sensors_live = on_live.clone();
            transport.subscribe(
                KIND_SENSORS,
                Rc::new(move |msg: &SyncMessage| {
                    let mut state = state;
                    let merged = state.sensors.peek().merged_with(&msg.data);
                    state.sensors.set(merged);
                    sensors_live();
                }),
            );

            let status_live = on_live.clone();
            transport.subscribe(
                KIND_STATUS,
                Rc::new(move |msg: &SyncMessage| {
                    let mut state = state;
                    let merged = state.status.peek().merged_with(&msg.data);
                    state.status.set(merged);
                    status_live();
                }),
            );

            transport.subscribe(
                KIND_DISPLAY_STATE,
                Rc::new(move |msg: &SyncMessage| {
                    let mut state = state;
                    // Unknown values keep the current asset.
                    if let Ok(display) = serde_json::from_value(msg.data.clone()) {
                        state.display.set(display);
                    }
                }),
            );
        }
    });

    let status = state.status.read().clone();
    let sensors = state.sensors.read().clone();
    let display = *state.display.read();
    let connected = *state.connected.read();

    rsx! {
        div {
            style: "max-width: 1080px; margin: 0 auto; padding: 24px; font-family: system-ui, -apple-system, sans-serif;",

            AssetLoop { state: display }

            div {
                style: "display: flex; align-items: center; justify-content: space-between; margin-top: 20px;",
                StatusLamp { status: status.status }
                if !connected {
                    span {
                        style: "font-size: 12px; color: #aaa;",
                        "waiting for control surface…"
                    }
                }
            }

            LikelihoodGauge { likelihood: status.likelihood }
            EtaReadout { eta: status.eta }
            SensorGrid { sensors }
        }
    }
}
