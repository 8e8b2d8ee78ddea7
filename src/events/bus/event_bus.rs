// events/bus/event_bus.rs
//
// Synchronous event bus.
//
// - Handlers run immediately, in subscription order
// - Every emission is logged and kept in an in-memory event log
// - A panicking handler does not stop the remaining handlers

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;

use crate::events::types::DomainEvent;

/// Type-erased handler; downcasts to the concrete event inside
type EventHandler = Arc<dyn Fn(&dyn Any) + Send + Sync>;

pub struct EventBus {
    /// Handlers keyed by event TypeId
    handlers: Arc<RwLock<HashMap<TypeId, Vec<EventHandler>>>>,

    event_log: Arc<RwLock<Vec<EventLogEntry>>>,
}

/// A logged emission
#[derive(Debug, Clone, Serialize)]
pub struct EventLogEntry {
    pub event_type: String,
    pub event_id: String,
    pub occurred_at: String,
    pub handler_count: usize,
    /// The event itself, as JSON
    pub payload: serde_json::Value,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            event_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Subscribe to one event type
    ///
    /// ```ignore
    /// bus.subscribe::<SongCreated, _>(|event| {
    ///     log::info!("New song: {}", event.title);
    /// });
    /// ```
    pub fn subscribe<E, F>(&self, handler: F)
    where
        E: DomainEvent + 'static,
        F: Fn(&E) + Send + Sync + 'static,
    {
        let wrapped: EventHandler = Arc::new(move |event_any: &dyn Any| {
            if let Some(event) = event_any.downcast_ref::<E>() {
                handler(event);
            } else {
                log::error!(
                    "Failed to downcast event in handler for {}",
                    std::any::type_name::<E>()
                );
            }
        });

        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(TypeId::of::<E>())
            .or_default()
            .push(wrapped);
    }

    /// Log the event, then run its handlers
    pub fn emit<E>(&self, event: E)
    where
        E: DomainEvent + Serialize + 'static,
    {
        // Handlers run without the lock so they may subscribe or emit
        let event_handlers: Vec<EventHandler> = self
            .handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .cloned()
            .unwrap_or_default();
        let handler_count = event_handlers.len();

        let payload = serde_json::to_value(&event).unwrap_or_else(|e| {
            log::warn!("Could not serialize {}: {}", event.event_type(), e);
            serde_json::Value::Null
        });

        let entry = EventLogEntry {
            event_type: event.event_type().to_string(),
            event_id: event.event_id().to_string(),
            occurred_at: event.occurred_at().to_rfc3339(),
            handler_count,
            payload,
        };

        log::debug!(
            "[EVENT] {} (id: {}) | {} handlers",
            entry.event_type,
            entry.event_id,
            entry.handler_count
        );

        self.event_log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);

        for (index, handler) in event_handlers.iter().enumerate() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                handler(&event as &dyn Any);
            }));

            if let Err(panic) = result {
                log::error!(
                    "Handler {} for {} panicked: {:?}",
                    index,
                    event.event_type(),
                    panic
                );
            }
        }
    }

    pub fn get_event_log(&self) -> Vec<EventLogEntry> {
        self.event_log
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_event_log(&self) {
        self.event_log
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn subscriber_count<E>(&self) -> usize
    where
        E: 'static,
    {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&TypeId::of::<E>())
            .map(Vec::len)
            .unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

// Clones share handlers and log
impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            event_log: Arc::clone(&self.event_log),
        }
    }
}
