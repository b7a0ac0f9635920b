//! Browser implementation of the scheduler capability.
//!
//! Wraps `window.setInterval` / `setTimeout` behind the [`Scheduler`]
//! trait. Guards keep the wasm closures alive; dropping a guard clears the
//! timer and releases its closure, so a surface cannot leak a dangling
//! timer past a phase exit or teardown.

use fwk_utils::sched::{Scheduler, TimerGuard};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

/// Timers backed by the browsing context's event loop.
#[derive(Clone, Copy, Default)]
pub struct WebScheduler;

impl WebScheduler {
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for WebScheduler {
    fn every(&self, period_ms: u32, f: Box<dyn FnMut()>) -> TimerGuard {
        let Some(window) = web_sys::window() else {
            // Restricted context: hand back an inert guard rather than fail.
            return TimerGuard::new(Box::new(|| {}));
        };
        let closure = Closure::wrap(f);
        let handle = window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                period_ms as i32,
            )
            .unwrap_or(-1);
        TimerGuard::new(Box::new(move || {
            if handle >= 0 {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
            }
            drop(closure);
        }))
    }

    fn after(&self, delay_ms: u32, f: Box<dyn FnOnce()>) -> TimerGuard {
        let Some(window) = web_sys::window() else {
            return TimerGuard::new(Box::new(|| {}));
        };
        let closure = Closure::once(f);
        let handle = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms as i32,
            )
            .unwrap_or(-1);
        TimerGuard::new(Box::new(move || {
            if handle >= 0 {
                if let Some(window) = web_sys::window() {
                    window.clear_timeout_with_handle(handle);
                }
            }
            drop(closure);
        }))
    }
}
