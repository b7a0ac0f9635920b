//! Status lamp component.

use dioxus::prelude::*;
use fwk_core::Status;

fn lamp_color(status: Status) -> &'static str {
    match status {
        Status::Normal => "#2e7d32",
        Status::Watch => "#f9a825",
        Status::Warning => "#ef6c00",
        Status::Danger => "#c62828",
        Status::Subsiding => "#1565c0",
    }
}

/// Large colored status indicator with its label.
#[component]
pub fn StatusLamp(status: Status) -> Element {
    let color = lamp_color(status);
    rsx! {
        div {
            style: "display: flex; align-items: center; gap: 12px;",
            div {
                style: "width: 48px; height: 48px; border-radius: 50%; background: {color}; box-shadow: 0 0 16px {color};",
            }
            span {
                style: "font-size: 28px; font-weight: 700; letter-spacing: 2px; color: {color};",
                "{status}"
            }
        }
    }
}
