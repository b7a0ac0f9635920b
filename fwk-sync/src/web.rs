//! Browser backend: BroadcastChannel with a localStorage fallback.
//!
//! The live path is a single named BroadcastChannel shared by every kiosk
//! surface. The durable path is one localStorage key per message kind
//! holding the latest `{timestamp, data}` payload, read at subscribe time
//! for late joiners. If BroadcastChannel cannot be constructed (older
//! runtime, restricted context), construction degrades silently to
//! storage-event delivery with no change to the public contract — storage
//! events already fire in every *other* browsing context, matching the
//! broadcast semantics.

use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{BroadcastChannel, MessageEvent, StorageEvent};

use crate::{cache_key, Callback, SubscriptionId, SyncMessage, Transport};

/// Channel name shared by every kiosk surface.
const CHANNEL_NAME: &str = "fwk-kiosk";

struct Subscriber {
    id: u64,
    kind: String,
    callback: Callback,
}

struct Listeners {
    subscribers: Vec<Subscriber>,
    next_id: u64,
}

impl Listeners {
    fn dispatch(&self, message: &SyncMessage) {
        // Unknown kinds simply have no subscribers: a no-op, never an error.
        let recipients: Vec<Callback> = self
            .subscribers
            .iter()
            .filter(|s| s.kind == message.kind)
            .map(|s| s.callback.clone())
            .collect();
        for callback in recipients {
            callback(message);
        }
    }
}

/// Browser transport for one kiosk surface.
pub struct WebTransport {
    channel: Option<BroadcastChannel>,
    listeners: Rc<RefCell<Listeners>>,
    // Kept alive for the lifetime of the transport; dropping them would
    // detach the JS event handlers.
    _onmessage: Option<Closure<dyn FnMut(MessageEvent)>>,
    _onstorage: Option<Closure<dyn FnMut(StorageEvent)>>,
}

impl WebTransport {
    /// Probe the live channel and wire up whichever delivery path is
    /// available. Never fails: a fully restricted context still yields a
    /// transport that caches publishes for late joiners.
    pub fn new() -> Self {
        let listeners = Rc::new(RefCell::new(Listeners {
            subscribers: Vec::new(),
            next_id: 0,
        }));

        let channel = BroadcastChannel::new(CHANNEL_NAME).ok();
        let mut onmessage = None;
        let mut onstorage = None;

        match &channel {
            Some(channel) => {
                let sink = listeners.clone();
                let closure = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
                    if let Some(text) = event.data().as_string() {
                        if let Ok(message) = serde_json::from_str::<SyncMessage>(&text) {
                            sink.borrow().dispatch(&message);
                        }
                    }
                });
                channel.set_onmessage(Some(closure.as_ref().unchecked_ref()));
                onmessage = Some(closure);
            }
            None => {
                // Fallback: storage events fire in other tabs whenever the
                // durable cache is written.
                log::warn!("BroadcastChannel unavailable, falling back to storage events");
                let sink = listeners.clone();
                let closure = Closure::<dyn FnMut(StorageEvent)>::new(move |event: StorageEvent| {
                    let Some(key) = event.key() else { return };
                    let Some(kind) = key.strip_prefix("fwk-sync/") else {
                        return;
                    };
                    let Some(new_value) = event.new_value() else {
                        return;
                    };
                    if let Some(message) = parse_cached(kind, &new_value) {
                        sink.borrow().dispatch(&message);
                    }
                });
                if let Some(window) = web_sys::window() {
                    let _ = window.add_event_listener_with_callback(
                        "storage",
                        closure.as_ref().unchecked_ref(),
                    );
                }
                onstorage = Some(closure);
            }
        }

        Self {
            channel,
            listeners,
            _onmessage: onmessage,
            _onstorage: onstorage,
        }
    }

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|w| w.local_storage().ok().flatten())
    }

    fn read_cache(kind: &str) -> Option<SyncMessage> {
        let storage = Self::storage()?;
        let raw = storage.get_item(&cache_key(kind)).ok().flatten()?;
        parse_cached(kind, &raw)
    }
}

/// Decode a durable cache record (`{timestamp, data}`) into a message.
fn parse_cached(kind: &str, raw: &str) -> Option<SyncMessage> {
    let record: Value = serde_json::from_str(raw).ok()?;
    let timestamp = record.get("timestamp").and_then(Value::as_f64)?;
    let data = record.get("data")?.clone();
    Some(SyncMessage {
        kind: kind.to_string(),
        data,
        timestamp,
    })
}

impl Default for WebTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for WebTransport {
    fn publish(&self, kind: &str, data: Value) {
        let message = SyncMessage {
            kind: kind.to_string(),
            data,
            timestamp: js_sys::Date::now(),
        };

        // Durable cache first, so a late joiner can never observe a live
        // message that the cache does not yet reflect. This write is also
        // the fallback delivery path (storage events in other tabs).
        if let Some(storage) = Self::storage() {
            let record = serde_json::json!({
                "timestamp": message.timestamp,
                "data": message.data,
            });
            let _ = storage.set_item(&cache_key(kind), &record.to_string());
        }

        if let Some(channel) = &self.channel {
            if let Ok(text) = serde_json::to_string(&message) {
                let _ = channel.post_message(&JsValue::from_str(&text));
            }
        }
    }

    fn subscribe(&self, kind: &str, callback: Callback) -> SubscriptionId {
        let id = {
            let mut listeners = self.listeners.borrow_mut();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.subscribers.push(Subscriber {
                id,
                kind: kind.to_string(),
                callback: callback.clone(),
            });
            id
        };
        // Late joiner replay from the durable cache, exactly once.
        if let Some(message) = Self::read_cache(kind) {
            callback(&message);
        }
        SubscriptionId(id)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        // One subscriber list feeds both the live and the fallback path, so
        // removing the entry severs both.
        self.listeners
            .borrow_mut()
            .subscribers
            .retain(|s| s.id != id.0);
    }
}
