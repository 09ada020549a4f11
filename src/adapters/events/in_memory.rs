//! In-memory broadcast bus.
//!
//! Synchronous, in-process, best-effort delivery: no persistence and no
//! replay. A subscriber that registers after an event was published never
//! sees it.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::ports::{
    BroadcastEvent, BroadcastHandler, BroadcastPublisher, BroadcastSubscriber, Subscription,
    Topic,
};

type HandlerTable = HashMap<Topic, Vec<(u64, Arc<dyn BroadcastHandler>)>>;

/// Typed broadcast bus shared by every view of one application.
///
/// # Example
///
/// ```ignore
/// let bus = Arc::new(InMemoryBroadcastBus::new());
/// let _sub = bus.subscribe(Topic::FlightSeats, dashboard.clone());
/// bus.publish(BroadcastEvent::FlightSeats(snapshot));
/// ```
pub struct InMemoryBroadcastBus {
    handlers: Arc<RwLock<HandlerTable>>,
    next_id: AtomicU64,
    published: AtomicU64,
}

impl InMemoryBroadcastBus {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(RwLock::new(HashMap::new())),
            next_id: AtomicU64::new(0),
            published: AtomicU64::new(0),
        }
    }

    /// Number of handlers currently registered for `topic`.
    pub fn handler_count(&self, topic: Topic) -> usize {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic)
            .map_or(0, Vec::len)
    }

    /// Total events published since creation.
    pub fn published_count(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }

    fn remove(table: &Weak<RwLock<HandlerTable>>, topic: Topic, id: u64) {
        let Some(table) = table.upgrade() else {
            return;
        };
        let mut handlers = table.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(list) = handlers.get_mut(&topic) {
            list.retain(|(handler_id, _)| *handler_id != id);
            if list.is_empty() {
                handlers.remove(&topic);
            }
        }
    }
}

impl Default for InMemoryBroadcastBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastPublisher for InMemoryBroadcastBus {
    fn publish(&self, event: BroadcastEvent) -> usize {
        self.published.fetch_add(1, Ordering::Relaxed);

        // Snapshot so handlers may (un)subscribe while being called.
        let handlers: Vec<Arc<dyn BroadcastHandler>> = {
            let table = self.handlers.read().unwrap_or_else(PoisonError::into_inner);
            table
                .get(&event.topic())
                .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
                .unwrap_or_default()
        };

        for handler in &handlers {
            tracing::trace!(handler = handler.name(), topic = ?event.topic(), "Delivering broadcast");
            handler.handle(&event);
        }
        handlers.len()
    }
}

impl BroadcastSubscriber for InMemoryBroadcastBus {
    fn subscribe(&self, topic: Topic, handler: Arc<dyn BroadcastHandler>) -> Subscription {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(handler = handler.name(), ?topic, "Broadcast subscriber registered");
        self.handlers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(topic)
            .or_default()
            .push((id, handler));

        let table = Arc::downgrade(&self.handlers);
        Subscription::new(move || Self::remove(&table, topic, id))
    }
}
