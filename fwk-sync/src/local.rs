//! In-process bus backend.
//!
//! Shared hub with per-surface endpoints, mirroring the browser backend's
//! semantics: a publish reaches every *other* endpoint (BroadcastChannel
//! does not deliver to the publishing context) and the hub keeps the latest
//! payload per kind for late joiners. Single-threaded by design
//! (`Rc<RefCell<_>>`), like every other shared structure in the kiosk.

use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{cache_key, Callback, SubscriptionId, SyncMessage, Transport};

struct Subscriber {
    id: u64,
    endpoint: u64,
    kind: String,
    callback: Callback,
}

struct HubInner {
    cache: HashMap<String, SyncMessage>,
    subscribers: Vec<Subscriber>,
    next_subscription: u64,
    next_endpoint: u64,
}

/// Shared in-process message hub. Create one hub per process and one
/// endpoint per surface.
#[derive(Clone)]
pub struct LocalHub {
    inner: Rc<RefCell<HubInner>>,
}

impl LocalHub {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(HubInner {
                cache: HashMap::new(),
                subscribers: Vec::new(),
                next_subscription: 0,
                next_endpoint: 0,
            })),
        }
    }

    /// A transport handle representing one surface.
    pub fn endpoint(&self) -> LocalTransport {
        let mut inner = self.inner.borrow_mut();
        let endpoint = inner.next_endpoint;
        inner.next_endpoint += 1;
        LocalTransport {
            inner: self.inner.clone(),
            endpoint,
        }
    }

    fn now_ms() -> f64 {
        #[cfg(target_arch = "wasm32")]
        {
            js_sys::Date::now()
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            chrono::Utc::now().timestamp_millis() as f64
        }
    }
}

impl Default for LocalHub {
    fn default() -> Self {
        Self::new()
    }
}

/// One surface's handle onto a [`LocalHub`].
pub struct LocalTransport {
    inner: Rc<RefCell<HubInner>>,
    endpoint: u64,
}

impl Transport for LocalTransport {
    fn publish(&self, kind: &str, data: Value) {
        let message = SyncMessage {
            kind: kind.to_string(),
            data,
            timestamp: LocalHub::now_ms(),
        };
        // Snapshot the recipients before invoking callbacks so a callback
        // may subscribe or unsubscribe without re-entrant borrows.
        let recipients: Vec<Callback> = {
            let mut inner = self.inner.borrow_mut();
            inner.cache.insert(kind.to_string(), message.clone());
            inner
                .subscribers
                .iter()
                .filter(|s| s.kind == kind && s.endpoint != self.endpoint)
                .map(|s| s.callback.clone())
                .collect()
        };
        log::debug!(
            "publish {kind} from endpoint {} to {} subscriber(s)",
            self.endpoint,
            recipients.len()
        );
        for callback in recipients {
            callback(&message);
        }
    }

    fn subscribe(&self, kind: &str, callback: Callback) -> SubscriptionId {
        let (id, cached) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_subscription;
            inner.next_subscription += 1;
            inner.subscribers.push(Subscriber {
                id,
                endpoint: self.endpoint,
                kind: kind.to_string(),
                callback: callback.clone(),
            });
            (id, inner.cache.get(kind).cloned())
        };
        // Late joiner replay: the last cached payload, exactly once.
        if let Some(message) = cached {
            callback(&message);
        }
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .borrow_mut()
            .subscribers
            .retain(|s| s.id != id.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn collector() -> (Rc<RefCell<Vec<SyncMessage>>>, Callback) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let callback: Callback = Rc::new(move |msg: &SyncMessage| {
            sink.borrow_mut().push(msg.clone());
        });
        (seen, callback)
    }

    #[test]
    fn test_publish_reaches_other_endpoints() {
        let hub = LocalHub::new();
        let control = hub.endpoint();
        let display = hub.endpoint();
        let (seen, callback) = collector();
        display.subscribe("status-snapshot", callback);

        control.publish("status-snapshot", serde_json::json!({ "likelihood": 12.0 }));
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].kind, "status-snapshot");
        assert_eq!(seen[0].data["likelihood"], 12.0);
    }

    #[test]
    fn test_publish_does_not_echo_to_self() {
        let hub = LocalHub::new();
        let control = hub.endpoint();
        let (seen, callback) = collector();
        control.subscribe("set-rain", callback);
        control.publish("set-rain", serde_json::json!(40.0));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_late_joiner_gets_cached_payload_exactly_once() {
        let hub = LocalHub::new();
        let control = hub.endpoint();
        control.publish("sensor-snapshot", serde_json::json!({ "rain": 70.0 }));
        control.publish("sensor-snapshot", serde_json::json!({ "rain": 75.0 }));

        // Subscribed after both publishes: sees only the latest, once.
        let display = hub.endpoint();
        let (seen, callback) = collector();
        display.subscribe("sensor-snapshot", callback);
        let snapshot = seen.borrow().clone();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].data["rain"], 75.0);
    }

    #[test]
    fn test_no_cache_means_no_replay() {
        let hub = LocalHub::new();
        let display = hub.endpoint();
        let (seen, callback) = collector();
        display.subscribe("script", callback);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_kind_filtering() {
        let hub = LocalHub::new();
        let control = hub.endpoint();
        let display = hub.endpoint();
        let (seen, callback) = collector();
        display.subscribe("status-snapshot", callback);
        control.publish("sensor-snapshot", serde_json::json!({}));
        control.publish("some-future-kind", serde_json::json!({ "v": 2 }));
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_unsubscribe_removes_both_paths() {
        let hub = LocalHub::new();
        let control = hub.endpoint();
        let display = hub.endpoint();
        let (seen, callback) = collector();
        let id = display.subscribe("status-snapshot", callback);
        control.publish("status-snapshot", serde_json::json!({ "a": 1 }));
        display.unsubscribe(id);
        control.publish("status-snapshot", serde_json::json!({ "a": 2 }));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn test_duplicate_delivery_is_tolerated() {
        let hub = LocalHub::new();
        let control = hub.endpoint();
        let display = hub.endpoint();
        let latest = Rc::new(Cell::new(0.0));
        let sink = latest.clone();
        display.subscribe(
            "sensor-snapshot",
            Rc::new(move |msg: &SyncMessage| {
                // Latest write wins; duplicates and stale snapshots are
                // silently absorbed.
                sink.set(msg.data["rain"].as_f64().unwrap_or(sink.get()));
            }),
        );
        let payload = serde_json::json!({ "rain": 30.0 });
        control.publish("sensor-snapshot", payload.clone());
        control.publish("sensor-snapshot", payload);
        control.publish("sensor-snapshot", serde_json::json!({ "rain": 10.0 }));
        assert_eq!(latest.get(), 10.0);
    }

    #[test]
    fn test_callback_may_subscribe_reentrantly() {
        let hub = LocalHub::new();
        let control = hub.endpoint();
        let display = Rc::new(hub.endpoint());
        let inner_display = display.clone();
        let (inner_seen, inner_callback) = collector();
        display.subscribe(
            "status-snapshot",
            Rc::new(move |_msg: &SyncMessage| {
                inner_display.subscribe("sensor-snapshot", inner_callback.clone());
            }),
        );
        control.publish("sensor-snapshot", serde_json::json!({ "rain": 5.0 }));
        control.publish("status-snapshot", serde_json::json!({}));
        // The re-entrant subscription replayed the cached sensor snapshot.
        assert_eq!(inner_seen.borrow().len(), 1);
    }
}
