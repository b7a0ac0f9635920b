//! Demo script controls.

use dioxus::prelude::*;
use fwk_core::DemoPhase;

/// Start/stop buttons for the scripted demo, with the current phase shown.
#[component]
pub fn DemoControls(phase: DemoPhase, on_start: EventHandler<()>, on_stop: EventHandler<()>) -> Element {
    let running = phase != DemoPhase::Idle;
    rsx! {
        div {
            style: "display: flex; align-items: center; gap: 12px; margin: 12px 0;",
            button {
                style: "padding: 8px 20px; font-size: 15px; border-radius: 6px; border: none; background: #1565c0; color: #fff; cursor: pointer;",
                onclick: move |_| on_start.call(()),
                if running { "Restart demo" } else { "Start demo" }
            }
            button {
                style: "padding: 8px 20px; font-size: 15px; border-radius: 6px; border: 1px solid #999; background: #fff; cursor: pointer;",
                disabled: !running,
                onclick: move |_| on_stop.call(()),
                "Stop"
            }
            span {
                style: "font-size: 13px; color: #777;",
                "phase: {phase}"
            }
        }
    }
}
