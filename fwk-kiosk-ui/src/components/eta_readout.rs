//! Countdown / ETA readout.

use dioxus::prelude::*;
use fwk_core::Eta;

/// Time-to-event readout: countdown seconds, "NOW", or quiet text.
#[component]
pub fn EtaReadout(eta: Eta) -> Element {
    let (text, color) = match eta {
        Eta::None => (String::new(), "#888"),
        Eta::NotExpected => ("No flood event expected".to_string(), "#888"),
        Eta::Now => ("FLOOD EVENT NOW".to_string(), "#c62828"),
        Eta::Seconds(s) => (format!("Estimated flood event in {s} s"), "#ef6c00"),
    };
    rsx! {
        p {
            style: "font-size: 20px; font-weight: 600; min-height: 28px; color: {color}; margin: 4px 0;",
            "{text}"
        }
    }
}
