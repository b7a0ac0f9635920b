//! Rain intensity slider.

use dioxus::prelude::*;

/// The single scalar control input, 0-100.
#[component]
pub fn RainSlider(rain: f64, on_change: EventHandler<f64>) -> Element {
    rsx! {
        div {
            style: "margin: 12px 0;",
            label {
                style: "font-size: 13px; color: #555; display: block; margin-bottom: 4px;",
                "Rain intensity: {rain:.0}%"
            }
            input {
                r#type: "range",
                min: "0",
                max: "100",
                step: "1",
                value: "{rain:.0}",
                style: "width: 100%;",
                oninput: move |event| {
                    if let Ok(value) = event.value().parse::<f64>() {
                        on_change.call(value);
                    }
                },
            }
        }
    }
}
