//! Transient alert toasts.

use dioxus::prelude::*;
use fwk_core::alerts::Toast;

/// Stack of live toasts, each dismissible by click. Expiry is driven by
/// the engine; this component only renders what is currently alive.
#[component]
pub fn ToastStack(toasts: Vec<Toast>, on_dismiss: EventHandler<u64>) -> Element {
    rsx! {
        div {
            style: "position: fixed; top: 16px; right: 16px; display: flex; flex-direction: column; gap: 8px; z-index: 100;",
            for toast in toasts {
                div {
                    key: "{toast.id}",
                    style: "background: #263238; color: #fff; padding: 12px 16px; border-radius: 8px; box-shadow: 0 2px 8px rgba(0,0,0,0.35); cursor: pointer; max-width: 320px;",
                    onclick: {
                        let id = toast.id;
                        move |_| on_dismiss.call(id)
                    },
                    "{toast.message}"
                }
            }
        }
    }
}
