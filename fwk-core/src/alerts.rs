//! One-shot transition alerts and the toast queue.
//!
//! Alerts are edge-triggered: an explicit function of (previous status,
//! current status) decides whether a transition qualifies, and a per-cycle
//! flag makes each alert fire at most once until the cycle resets.

use serde::{Deserialize, Serialize};

use crate::status::Status;

/// Transition types that raise a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlertKind {
    DangerEntered,
    CountdownStarted,
}

/// Edge detector: did this tick enter DANGER?
pub fn danger_edge(prev: Status, next: Status) -> bool {
    next == Status::Danger && prev != Status::Danger
}

/// A transient, user-dismissible notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: u64,
    pub kind: AlertKind,
    pub message: String,
    /// Ticks until auto-expiry.
    remaining_ticks: u32,
}

/// Maintains the one-shot flags and the live toast queue.
#[derive(Debug, Clone)]
pub struct Notifier {
    danger_fired: bool,
    countdown_fired: bool,
    toasts: Vec<Toast>,
    next_id: u64,
    toast_ticks: u32,
}

impl Notifier {
    pub fn new(toast_ticks: u32) -> Self {
        Self {
            danger_fired: false,
            countdown_fired: false,
            toasts: Vec::new(),
            next_id: 0,
            toast_ticks,
        }
    }

    /// React to a status transition. Enqueues the DANGER toast the first
    /// time DANGER is entered this cycle.
    pub fn on_status(&mut self, prev: Status, next: Status) {
        if danger_edge(prev, next) && !self.danger_fired {
            self.danger_fired = true;
            self.push(AlertKind::DangerEntered, "Flood danger level reached");
        }
    }

    /// React to the countdown starting. Fires at most once per cycle.
    pub fn on_countdown_started(&mut self) {
        if !self.countdown_fired {
            self.countdown_fired = true;
            self.push(AlertKind::CountdownStarted, "Flood event countdown started");
        }
    }

    fn push(&mut self, kind: AlertKind, message: &str) {
        let id = self.next_id;
        self.next_id += 1;
        log::info!("alert: {kind:?} ({message})");
        self.toasts.push(Toast {
            id,
            kind,
            message: message.to_string(),
            remaining_ticks: self.toast_ticks,
        });
    }

    /// Age every live toast one tick, dropping the expired ones.
    pub fn expire_tick(&mut self) {
        for toast in &mut self.toasts {
            toast.remaining_ticks = toast.remaining_ticks.saturating_sub(1);
        }
        self.toasts.retain(|t| t.remaining_ticks > 0);
    }

    /// Explicit user dismissal. Unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|t| t.id != id);
    }

    /// Clear the one-shot flags (demo restart or return to idle). Live
    /// toasts keep their own expiry.
    pub fn reset_flags(&mut self) {
        self.danger_fired = false;
        self.countdown_fired = false;
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_danger_edge() {
        assert!(danger_edge(Status::Warning, Status::Danger));
        assert!(danger_edge(Status::Normal, Status::Danger));
        assert!(!danger_edge(Status::Danger, Status::Danger));
        assert!(!danger_edge(Status::Danger, Status::Subsiding));
        assert!(!danger_edge(Status::Normal, Status::Watch));
    }

    #[test]
    fn test_danger_toast_fires_exactly_once_per_cycle() {
        let mut n = Notifier::new(12);
        n.on_status(Status::Warning, Status::Danger);
        assert_eq!(n.toasts().len(), 1);
        // Leaving and re-entering DANGER in the same cycle stays quiet.
        n.on_status(Status::Danger, Status::Warning);
        n.on_status(Status::Warning, Status::Danger);
        assert_eq!(n.toasts().len(), 1);
        // A new cycle re-arms the flag.
        n.reset_flags();
        n.on_status(Status::Warning, Status::Danger);
        assert_eq!(n.toasts().len(), 2);
    }

    #[test]
    fn test_countdown_toast_is_one_shot() {
        let mut n = Notifier::new(12);
        n.on_countdown_started();
        n.on_countdown_started();
        assert_eq!(n.toasts().len(), 1);
    }

    #[test]
    fn test_toasts_auto_expire() {
        let mut n = Notifier::new(3);
        n.on_countdown_started();
        n.expire_tick();
        n.expire_tick();
        assert_eq!(n.toasts().len(), 1);
        n.expire_tick();
        assert!(n.toasts().is_empty());
    }

    #[test]
    fn test_dismiss_removes_only_target() {
        let mut n = Notifier::new(12);
        n.on_countdown_started();
        n.on_status(Status::Normal, Status::Danger);
        assert_eq!(n.toasts().len(), 2);
        let first_id = n.toasts()[0].id;
        n.dismiss(first_id);
        assert_eq!(n.toasts().len(), 1);
        assert_ne!(n.toasts()[0].id, first_id);
        // Dismissing an unknown id is a no-op.
        n.dismiss(9999);
        assert_eq!(n.toasts().len(), 1);
    }
}
