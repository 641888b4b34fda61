//! Handler registration system.
//!
//! The registry maintains a mapping from event kinds to their handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::decoding::EventKind;

use super::traits::EventHandler;

/// Registry of all event handlers, built at startup.
pub struct HandlerRegistry {
    handlers: HashMap<EventKind, Vec<Arc<dyn EventHandler>>>,
    all_handlers: Vec<Arc<dyn EventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            all_handlers: Vec::new(),
        }
    }

    /// Register a handler for all of its declared triggers.
    pub fn register<H: EventHandler>(&mut self, handler: H) {
        let handler = Arc::new(handler);

        for kind in handler.triggers() {
            self.handlers
                .entry(kind)
                .or_default()
                .push(handler.clone());
        }

        self.all_handlers.push(handler);
    }

    /// Get handlers for a specific event kind.
    pub fn handlers_for(&self, kind: EventKind) -> &[Arc<dyn EventHandler>] {
        self.handlers.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn handler_count(&self) -> usize {
        self.all_handlers.len()
    }

    pub fn trigger_count(&self) -> usize {
        self.handlers.len()
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the handler registry with all handlers.
///
/// This is where handlers are registered at compile-time. Add new handler
/// registrations here as they are implemented.
pub fn build_registry() -> HandlerRegistry {
    let mut registry = HandlerRegistry::new();

    super::handlers::access_controls::register_handlers(&mut registry);
    super::handlers::rent::register_handlers(&mut registry);
    super::handlers::spectate::register_handlers(&mut registry);

    tracing::info!(
        "Built handler registry with {} handlers covering {} event kinds",
        registry.handler_count(),
        registry.trigger_count()
    );

    registry
}
