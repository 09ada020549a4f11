//! Broadcast ports - typed in-process fan-out between views.
//!
//! Replaces ad-hoc window events: publishers and subscribers share a bus
//! instance that is created per application and passed explicitly.

use std::fmt;
use std::sync::Arc;

use crate::domain::booking::SeatSnapshot;

/// Broadcast topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    FlightSeats,
}

/// Events carried by the bus. Each variant belongs to exactly one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BroadcastEvent {
    FlightSeats(SeatSnapshot),
}

impl BroadcastEvent {
    pub fn topic(&self) -> Topic {
        match self {
            BroadcastEvent::FlightSeats(_) => Topic::FlightSeats,
        }
    }
}

/// Receiver of broadcast events.
///
/// Called synchronously on the publisher's thread, so handlers must be
/// quick and must not block on I/O.
pub trait BroadcastHandler: Send + Sync {
    fn handle(&self, event: &BroadcastEvent);

    /// Handler name for logging.
    fn name(&self) -> &'static str;
}

/// Port for publishing events to every current subscriber of their topic.
pub trait BroadcastPublisher: Send + Sync {
    /// Delivers `event` and returns how many handlers were invoked.
    fn publish(&self, event: BroadcastEvent) -> usize;
}

/// Port for registering handlers.
pub trait BroadcastSubscriber: Send + Sync {
    /// Registers `handler` for `topic`. The handler stays registered until
    /// the returned `Subscription` is dropped.
    fn subscribe(&self, topic: Topic, handler: Arc<dyn BroadcastHandler>) -> Subscription;
}

/// Combined trait for bus implementations.
pub trait BroadcastBus: BroadcastPublisher + BroadcastSubscriber {}

impl<T: BroadcastPublisher + BroadcastSubscriber> BroadcastBus for T {}

/// Guard that removes a handler from its bus when dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Adapts a closure into a named handler.
pub struct HandlerFn<F> {
    name: &'static str,
    f: F,
}

pub fn handler_fn<F>(name: &'static str, f: F) -> Arc<dyn BroadcastHandler>
where
    F: Fn(&BroadcastEvent) + Send + Sync + 'static,
{
    Arc::new(HandlerFn { name, f })
}

impl<F> BroadcastHandler for HandlerFn<F>
where
    F: Fn(&BroadcastEvent) + Send + Sync,
{
    fn handle(&self, event: &BroadcastEvent) {
        (self.f)(event)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
