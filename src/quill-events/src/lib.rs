//! Synchronous named-event hub for Quill components.
//!
//! The hub carries the shell's embedder-visible events. Components publish
//! and embedders subscribe by event name; payloads travel as JSON value
//! lists. Emission is synchronous and re-entrant: a listener may emit or
//! change subscriptions from inside an emission.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use uuid::Uuid;

/// Events whose name starts with this prefix are internal to the shell and
/// not part of the documented embedder surface.
pub const INTERNAL_EVENT_PREFIX: &str = "-";

/// Listener invoked with an emission's argument list.
pub type Listener = Arc<dyn Fn(&[Value]) + Send + Sync>;

/// Handle identifying one registered listener.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventSubscription {
    id: Uuid,
    event: String,
}

impl EventSubscription {
    fn new(event: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            event: event.to_string(),
        }
    }

    /// Get the subscription ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Name of the event this subscription listens on.
    pub fn event(&self) -> &str {
        &self.event
    }
}

/// Subscribe/emit surface consumed by components that observe or bridge
/// named events.
pub trait Emitter: Send + Sync {
    /// Register a listener for `event`.
    fn on(&self, event: &str, listener: Listener) -> EventSubscription;

    /// Remove a previously registered listener.
    fn off(&self, subscription: &EventSubscription);

    /// Invoke every listener currently registered for `event`.
    fn emit(&self, event: &str, args: &[Value]);

    /// Number of listeners currently registered for `event`.
    fn listener_count(&self, event: &str) -> usize;
}

/// Default emitter implementation backed by a name-keyed listener table.
pub struct EventHub {
    listeners: RwLock<HashMap<String, Vec<(Uuid, Listener)>>>,
}

impl EventHub {
    /// Create a new hub with no listeners.
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Total number of active subscriptions across all events.
    pub fn subscription_count(&self) -> usize {
        self.listeners.read().values().map(Vec::len).sum()
    }
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for EventHub {
    fn on(&self, event: &str, listener: Listener) -> EventSubscription {
        let subscription = EventSubscription::new(event);
        self.listeners
            .write()
            .entry(event.to_string())
            .or_default()
            .push((subscription.id, listener));
        subscription
    }

    fn off(&self, subscription: &EventSubscription) {
        let mut listeners = self.listeners.write();
        if let Some(entries) = listeners.get_mut(subscription.event()) {
            entries.retain(|(id, _)| *id != subscription.id);
            if entries.is_empty() {
                listeners.remove(subscription.event());
            }
        }
    }

    fn emit(&self, event: &str, args: &[Value]) {
        // Listeners run with the table lock released; a listener may
        // re-enter the hub.
        let handlers: Vec<Listener> = {
            let listeners = self.listeners.read();
            match listeners.get(event) {
                Some(entries) => entries.iter().map(|(_, l)| Arc::clone(l)).collect(),
                None => return,
            }
        };
        tracing::trace!(target: "quill::events", event, listeners = handlers.len(), "emit");
        for handler in handlers {
            handler(args);
        }
    }

    fn listener_count(&self, event: &str) -> usize {
        self.listeners.read().get(event).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn counting_listener(count: &Arc<AtomicU32>) -> Listener {
        let count = Arc::clone(count);
        Arc::new(move |_args: &[Value]| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_emit_reaches_listeners() {
        let hub = EventHub::new();
        let count = Arc::new(AtomicU32::new(0));

        hub.on("ready", counting_listener(&count));
        hub.on("ready", counting_listener(&count));

        hub.emit("ready", &[]);
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(hub.listener_count("ready"), 2);
    }

    #[test]
    fn test_emit_without_listeners_is_noop() {
        let hub = EventHub::new();
        hub.emit("nobody-home", &[json!(1)]);
        assert_eq!(hub.listener_count("nobody-home"), 0);
    }

    #[test]
    fn test_listener_receives_args() {
        let hub = EventHub::new();
        let received = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let sink = Arc::clone(&received);
        hub.on(
            "did-navigate",
            Arc::new(move |args: &[Value]| {
                sink.lock().push(args.to_vec());
            }),
        );

        hub.emit("did-navigate", &[json!("https://example.com"), json!(200)]);
        assert_eq!(
            received.lock().as_slice(),
            &[vec![json!("https://example.com"), json!(200)]]
        );
    }

    #[test]
    fn test_off_removes_listener() {
        let hub = EventHub::new();
        let count = Arc::new(AtomicU32::new(0));

        let subscription = hub.on("ready", counting_listener(&count));
        assert_eq!(hub.subscription_count(), 1);

        hub.off(&subscription);
        assert_eq!(hub.subscription_count(), 0);

        hub.emit("ready", &[]);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reentrant_emit() {
        let hub = Arc::new(EventHub::new());
        let count = Arc::new(AtomicU32::new(0));

        let inner = Arc::clone(&hub);
        hub.on(
            "outer",
            Arc::new(move |_args: &[Value]| {
                inner.emit("inner", &[]);
            }),
        );
        hub.on("inner", counting_listener(&count));

        hub.emit("outer", &[]);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
