//! Cross-surface synchronization.
//!
//! A best-effort publish/subscribe channel between independent surfaces,
//! with a durable last-value cache so a late joiner recovers the latest
//! known state instead of waiting for the next publish.
//!
//! Two backends behind one contract:
//! - [`local::LocalHub`] — in-process bus for native surfaces and tests.
//! - `web::WebTransport` (wasm32 only) — BroadcastChannel for live
//!   delivery plus localStorage for the durable cache, degrading silently
//!   to storage-event delivery when BroadcastChannel cannot be constructed.
//!
//! Consumers must treat unknown message kinds as no-ops, tolerate duplicate
//! or out-of-order delivery, and apply each received message as the new
//! authoritative snapshot (latest write wins).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::rc::Rc;

pub mod local;
#[cfg(target_arch = "wasm32")]
pub mod web;

/// Tagged payload exchanged between surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncMessage {
    pub kind: String,
    pub data: Value,
    /// Milliseconds since the Unix epoch, stamped by the publisher.
    pub timestamp: f64,
}

/// Handle returned by [`Transport::subscribe`]; pass it back to
/// [`Transport::unsubscribe`] to remove both delivery paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Delivery callback. Runs on the surface's own (single) thread.
pub type Callback = Rc<dyn Fn(&SyncMessage)>;

/// Best-effort pub/sub with a durable last-value cache per kind.
pub trait Transport {
    /// Broadcast a timestamped message to all other open surfaces and cache
    /// it as the latest payload for `kind`.
    fn publish(&self, kind: &str, data: Value);

    /// Register a listener for live messages of `kind`. If a cached payload
    /// exists it is delivered immediately, exactly once, before any live
    /// message — so a surface opened after publishing has begun is not
    /// stuck on defaults.
    fn subscribe(&self, kind: &str, callback: Callback) -> SubscriptionId;

    /// Remove the listener and any secondary delivery path.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Durable cache key for a message kind.
pub(crate) fn cache_key(kind: &str) -> String {
    format!("fwk-sync/{kind}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_wire_format() {
        let msg = SyncMessage {
            kind: "status-snapshot".to_string(),
            data: serde_json::json!({ "status": "WATCH" }),
            timestamp: 1_700_000_000_000.0,
        };
        let json = serde_json::to_string(&msg).unwrap();
        let back: SyncMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind, msg.kind);
        assert_eq!(back.data, msg.data);
        assert_eq!(back.timestamp, msg.timestamp);
    }

    #[test]
    fn test_cache_key_is_namespaced() {
        assert_eq!(cache_key("set-rain"), "fwk-sync/set-rain");
    }
}
