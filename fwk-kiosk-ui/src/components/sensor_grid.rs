//! Sensor readings grid.

use dioxus::prelude::*;
use fwk_core::snapshot::SensorSnapshot;

/// Current readings for every metric, derived values included.
#[component]
pub fn SensorGrid(sensors: SensorSnapshot) -> Element {
    let rows = [
        ("River level", format!("{:.2} m", sensors.level)),
        ("Flow", format!("{:.1} m\u{b3}/s", sensors.flow)),
        ("Turbidity", format!("{:.1} NTU", sensors.turbidity)),
        ("Barometric pressure", format!("{:.2} kPa", sensors.pressure)),
        ("Discharge", format!("{:.1} m\u{b3}/s", sensors.discharge)),
        ("Sediment load", format!("{:.2} kg/s", sensors.sediment)),
    ];
    rsx! {
        div {
            style: "display: grid; grid-template-columns: repeat(3, 1fr); gap: 10px; margin: 12px 0;",
            for (label, value) in rows {
                div {
                    style: "background: #f5f5f5; border-radius: 8px; padding: 10px;",
                    div {
                        style: "font-size: 12px; color: #777;",
                        "{label}"
                    }
                    div {
                        style: "font-size: 20px; font-weight: 600;",
                        "{value}"
                    }
                }
            }
        }
    }
}
