//! The handler registration table.
//!
//! A [`HandlerRegistry`] maps event types to handlers. It is built once at
//! process start by explicit construction (no global state, no runtime
//! registration) and shared read-only by every in-flight delivery, which
//! makes unsynchronized concurrent routing safe. Tests construct registries
//! with spy handlers the same way `main` constructs the production one.

use std::collections::HashMap;
use std::sync::Arc;

use super::contract::EventHandler;

/// Immutable mapping from event type to handler.
#[derive(Clone, Default)]
pub struct HandlerRegistry {
    handlers: HashMap<&'static str, Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        HandlerRegistry {
            handlers: HashMap::new(),
        }
    }

    /// Adds a handler, keyed by its own [`EventHandler::event_type`].
    ///
    /// Registering a second handler for the same event type replaces the
    /// first; each event type has exactly one consumer.
    pub fn register(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.handlers.insert(handler.event_type(), handler);
        self
    }

    /// Routes an event type to its handler.
    ///
    /// Pure lookup: no side effects, no I/O. `None` means the event type is
    /// unregistered, which is a valid outcome (the webhook configuration on
    /// GitHub's side may legitimately be broader than the set of event
    /// types this service cares about).
    pub fn route(&self, event_type: &str) -> Option<&Arc<dyn EventHandler>> {
        self.handlers.get(event_type)
    }

    /// The registered event types, for startup logging and tests.
    pub fn event_types(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for HandlerRegistry {
    /// Debug lists the routing keys, not the handlers.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut types: Vec<_> = self.event_types().collect();
        types.sort_unstable();
        f.debug_struct("HandlerRegistry")
            .field("event_types", &types)
            .finish()
    }
}
