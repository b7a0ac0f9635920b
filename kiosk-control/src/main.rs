//! Operator control surface.
//!
//! Owns the simulation engine and every timer: the simulation tick, the
//! 1 Hz countdown, and nothing else — toast expiry rides the tick. Each
//! tick publishes a sensor snapshot and a status snapshot over the
//! transport; passive displays render solely from those messages.
//!
//! Data flow per tick:
//! 1. `Engine::tick()` advances the demo script, sensors, likelihood,
//!    status, ETA and alerts.
//! 2. The countdown timer is armed or released depending on whether a
//!    windowed countdown is active (double-start guarded by the slot).
//! 3. Snapshots land in the shared signals and go out over the transport.

use std::cell::RefCell;
use std::rc::Rc;

use dioxus::prelude::*;

use fwk_core::alerts::Toast;
use fwk_core::config::SIM_TICK_MS;
use fwk_core::snapshot::{
    DisplayState, ScriptCommand, KIND_DISPLAY_STATE, KIND_SCRIPT, KIND_SENSORS, KIND_SET_RAIN,
    KIND_STATUS,
};
use fwk_core::Engine;
use fwk_kiosk_ui::components::{
    DemoControls, EtaReadout, LikelihoodGauge, RainSlider, SensorGrid, StatusLamp, ToastStack,
};
use fwk_kiosk_ui::sched::WebScheduler;
use fwk_kiosk_ui::state::KioskState;
use fwk_sync::{SyncMessage, Transport};
use fwk_utils::sched::{Scheduler, TimerGuard};

/// The demo script name understood by the `script` command.
const SCRIPT_NAME: &str = "flood-demo";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("kiosk-control-root"))
        .launch(App);
}

#[cfg(target_arch = "wasm32")]
fn make_transport() -> Rc<dyn Transport> {
    Rc::new(fwk_sync::web::WebTransport::new())
}

/// Native builds (cargo check, tests) have no browsing context; the
/// in-process bus satisfies the same contract.
#[cfg(not(target_arch = "wasm32"))]
fn make_transport() -> Rc<dyn Transport> {
    Rc::new(fwk_sync::local::LocalHub::new().endpoint())
}

#[component]
fn App() -> Element {
    let state = use_context_provider(KioskState::new);
    let toasts: Signal<Vec<Toast>> = use_signal(Vec::new);
    let rain: Signal<f64> = use_signal(|| 0.0);

    let engine = use_hook(|| Rc::new(RefCell::new(Engine::with_defaults(js_seed()))));
    let transport = use_hook(make_transport);
    let scheduler = use_hook(WebScheduler::new);
    // Guards for the long-lived timers and the countdown slot. Dropping a
    // guard cancels its timer, so teardown cannot leak one.
    let timers = use_hook(|| Rc::new(RefCell::new(Vec::<TimerGuard>::new())));
    let countdown_timer = use_hook(|| Rc::new(RefCell::new(Option::<TimerGuard>::None)));

    // Arm the simulation tick and the command subscriptions once on mount.
    use_effect({
        let engine = engine.clone();
        let transport = transport.clone();
        let timers = timers.clone();
        let countdown_timer = countdown_timer.clone();
        move || {
            let tick_engine = engine.clone();
            let tick_transport = transport.clone();
            let tick_countdown = countdown_timer.clone();
            let guard = scheduler.every(
                SIM_TICK_MS,
                Box::new(move || {
                    let mut state = state;
                    let mut rain = rain;
                    let mut toasts = toasts;
                    let mut engine = tick_engine.borrow_mut();
                    engine.tick();

                    // Countdown timer lifecycle: arm while a windowed
                    // countdown runs, release as soon as it stops. The slot
                    // check guards against a double start.
                    let mut slot = tick_countdown.borrow_mut();
                    if engine.countdown_active() && slot.is_none() {
                        let second_engine = tick_engine.clone();
                        *slot = Some(scheduler.every(
                            1000,
                            Box::new(move || {
                                second_engine.borrow_mut().second();
                            }),
                        ));
                    } else if !engine.countdown_active() && slot.is_some() {
                        *slot = None;
                    }
                    drop(slot);

                    let sensors = engine.sensor_snapshot();
                    let status = engine.status_snapshot();
                    state.sensors.set(sensors.clone());
                    state.status.set(status.clone());
                    rain.set(sensors.rain);
                    toasts.set(engine.toasts().to_vec());

                    if let Ok(data) = serde_json::to_value(&sensors) {
                        tick_transport.publish(KIND_SENSORS, data);
                    }
                    if let Ok(data) = serde_json::to_value(&status) {
                        tick_transport.publish(KIND_STATUS, data);
                    }
                }),
            );
            timers.borrow_mut().push(guard);

            // Remote set-rain commands (e.g. a second operator surface).
            let rain_engine = engine.clone();
            transport.subscribe(
                KIND_SET_RAIN,
                Rc::new(move |msg: &SyncMessage| {
                    if let Some(pct) = msg.data.as_f64() {
                        rain_engine.borrow_mut().set_rain(pct);
                    }
                }),
            );

            // Remote run/stop script commands.
            let script_engine = engine.clone();
            transport.subscribe(
                KIND_SCRIPT,
                Rc::new(move |msg: &SyncMessage| {
                    let Ok(cmd) = serde_json::from_value::<ScriptCommand>(msg.data.clone())
                    else {
                        return;
                    };
                    if cmd.name != SCRIPT_NAME {
                        return;
                    }
                    let mut engine = script_engine.borrow_mut();
                    if cmd.running {
                        engine.start_demo();
                    } else {
                        engine.stop_demo();
                    }
                }),
            );
        }
    });

    let set_rain = {
        let engine = engine.clone();
        move |pct: f64| {
            engine.borrow_mut().set_rain(pct);
        }
    };
    let start_demo = {
        let engine = engine.clone();
        let transport = transport.clone();
        move |_| {
            engine.borrow_mut().start_demo();
            publish_script(&*transport, true);
            publish_display(&*transport, state, DisplayState::Rain);
        }
    };
    let stop_demo = {
        let engine = engine.clone();
        let transport = transport.clone();
        move |_| {
            engine.borrow_mut().stop_demo();
            publish_script(&*transport, false);
            publish_display(&*transport, state, DisplayState::Normal);
        }
    };
    let dismiss = {
        let engine = engine.clone();
        move |id: u64| {
            engine.borrow_mut().dismiss_toast(id);
        }
    };

    let status = state.status.read().clone();
    let sensors = state.sensors.read().clone();

    rsx! {
        div {
            style: "max-width: 860px; margin: 0 auto; padding: 16px; font-family: system-ui, -apple-system, sans-serif;",

            h2 { "Flood Warning Kiosk — Control" }

            StatusLamp { status: status.status }
            LikelihoodGauge { likelihood: status.likelihood }
            EtaReadout { eta: status.eta }
            SensorGrid { sensors }

            RainSlider { rain: rain(), on_change: set_rain }
            DemoControls {
                phase: status.phase,
                on_start: start_demo,
                on_stop: stop_demo,
            }

            ToastStack { toasts: toasts(), on_dismiss: dismiss }
        }
    }
}

fn publish_script(transport: &dyn Transport, running: bool) {
    let cmd = ScriptCommand {
        name: SCRIPT_NAME.to_string(),
        running,
    };
    if let Ok(data) = serde_json::to_value(&cmd) {
        transport.publish(KIND_SCRIPT, data);
    }
}

fn publish_display(transport: &dyn Transport, mut state: KioskState, display: DisplayState) {
    state.display.set(display);
    if let Ok(data) = serde_json::to_value(display) {
        transport.publish(KIND_DISPLAY_STATE, data);
    }
}

/// Seed the jitter from wall-clock milliseconds so reloads differ.
fn js_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        0
    }
}
