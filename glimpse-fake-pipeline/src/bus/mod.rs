//! In-process publish/subscribe bus.
//!
//! Every logical event is a variant of [`Event`] and every subscriber picks
//! the topics it wants through an [`EventFilter`]. The bus is backed by a
//! `tokio::sync::broadcast` channel; events published while nobody listens
//! are dropped.

mod events;
mod subscription;

pub use events::{Event, EventFilter, Topic};
pub use subscription::Subscription;

use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::broadcast;
use tracing::{debug, warn};

/// Default number of events buffered per subscriber.
pub const DEFAULT_BUS_CAPACITY: usize = 1000;

/// The event bus shared by generators, relays and clients.
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    events_published: AtomicU64,
    capacity: usize,
}

impl EventBus {
    /// Create a bus with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_BUS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            events_published: AtomicU64::new(0),
            capacity,
        }
    }

    /// Subscribe to events matching a filter.
    ///
    /// Only events published after this call are received.
    pub fn subscribe(&self, filter: EventFilter) -> Subscription {
        debug!(filter = ?filter, "New subscription created");
        Subscription::new(self.sender.subscribe(), filter)
    }

    /// Publish an event, returning the number of subscribers it reached.
    pub fn publish(&self, event: Event) -> usize {
        let topic = event.topic();
        let items = event.item_count();

        self.events_published.fetch_add(1, Ordering::Relaxed);

        match self.sender.send(event) {
            Ok(receivers) => {
                debug!(topic = %topic, items, receivers, "Event published");
                receivers
            }
            Err(_) => {
                warn!(topic = %topic, items, "Event dropped (no receivers)");
                0
            }
        }
    }

    /// Total number of events published, delivered or not.
    pub fn events_published(&self) -> u64 {
        self.events_published.load(Ordering::Relaxed)
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
