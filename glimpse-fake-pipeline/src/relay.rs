//! User repository relay.
//!
//! Forwards request summaries found in the local store to the user
//! repository topic, so user listings refresh alongside request listings.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::bus::{Event, EventBus, EventFilter, Subscription, Topic};

pub struct UserRepositoryRelay {
    bus: Arc<EventBus>,
    subscription: Subscription,
}

impl UserRepositoryRelay {
    /// Subscribe to local request summaries.
    ///
    /// The subscription is taken immediately, so summaries published before
    /// the relay task starts are still forwarded.
    pub fn new(bus: Arc<EventBus>) -> Self {
        let subscription = bus.subscribe(EventFilter::topic(Topic::RequestSummaryFoundLocal));
        Self { bus, subscription }
    }

    /// Map an incoming event to the event it is relayed as.
    pub fn relay(event: Event) -> Option<Event> {
        match event {
            Event::RequestSummaryFoundLocal(view) => Some(Event::UserDetailFoundInternal(view)),
            _ => None,
        }
    }

    /// Forward events until the task is aborted or the bus is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.subscription.recv().await {
            if let Some(relayed) = Self::relay(event) {
                debug!(items = relayed.item_count(), "Relaying local requests to user repository");
                self.bus.publish(relayed);
            }
        }
        info!("User repository relay stopped");
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glimpse_fake_shared::RequestsView;

    #[test]
    fn test_relay_maps_local_summaries_only() {
        let view = RequestsView::default();

        assert_eq!(
            UserRepositoryRelay::relay(Event::RequestSummaryFoundLocal(view.clone())),
            Some(Event::UserDetailFoundInternal(view))
        );
        assert_eq!(UserRepositoryRelay::relay(Event::MessageSummaryFoundRemote(Vec::new())), None);
    }

    #[tokio::test]
    async fn test_relay_republishes_on_bus() {
        let bus = Arc::new(EventBus::new());
        let mut users = bus.subscribe(EventFilter::topic(Topic::UserDetailFoundInternal));
        let relay = UserRepositoryRelay::new(bus.clone()).spawn();

        bus.publish(Event::RequestSummaryFoundLocal(RequestsView::default()));

        assert_eq!(
            users.recv().await,
            Some(Event::UserDetailFoundInternal(RequestsView::default()))
        );
        relay.abort();
    }
}
