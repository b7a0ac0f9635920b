//! Flood-likelihood gauge.

use dioxus::prelude::*;

/// Horizontal bar showing the smoothed 0-100 likelihood score.
#[component]
pub fn LikelihoodGauge(likelihood: f64) -> Element {
    let pct = likelihood.clamp(0.0, 100.0);
    let width = format!("{pct:.1}%");
    rsx! {
        div {
            style: "margin: 8px 0;",
            div {
                style: "display: flex; justify-content: space-between; font-size: 13px; color: #555;",
                span { "Flood likelihood" }
                span { "{pct:.0}%" }
            }
            div {
                style: "height: 14px; background: #e0e0e0; border-radius: 7px; overflow: hidden;",
                div {
                    style: "height: 100%; width: {width}; background: linear-gradient(90deg, #43a047, #fbc02d, #e53935); transition: width 0.4s;",
                }
            }
        }
    }
}
