//! Looped-asset switcher for the passive displays.
//!
//! The actual video elements live outside the core; this component only
//! decides which looped asset the display should show, driven by the
//! trigger-state command.

use dioxus::prelude::*;
use fwk_core::snapshot::DisplayState;

/// Full-width banner standing in for the looping background video.
#[component]
pub fn AssetLoop(state: DisplayState) -> Element {
    let (asset, label, background) = match state {
        DisplayState::Normal => ("river-calm.loop", "Calm river", "#1b5e20"),
        DisplayState::Rain => ("river-storm.loop", "Storm conditions", "#0d47a1"),
    };
    rsx! {
        div {
            style: "border-radius: 10px; padding: 24px; color: #fff; background: {background}; text-align: center;",
            div {
                style: "font-size: 22px; font-weight: 600;",
                "{label}"
            }
            div {
                style: "font-size: 12px; opacity: 0.7;",
                "looping asset: {asset}"
            }
        }
    }
}
