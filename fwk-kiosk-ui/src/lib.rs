//! Shared Dioxus components and browser glue for the kiosk surfaces.

pub mod components;
pub mod sched;
pub mod state;
