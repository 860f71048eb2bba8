//! Page event bus
//!
//! A tokio broadcast channel standing in for `document.addEventListener`:
//! anything holding a clone can dispatch, every subscriber sees every event.

use tokio::sync::broadcast;

use super::events::PageEvent;

/// Default capacity of the broadcast channel
pub const DEFAULT_BUS_CAPACITY: usize = 256;

/// Cloneable handle for publishing and subscribing to page events
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PageEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event, returning the number of subscribers that got it
    pub fn publish(&self, event: PageEvent) -> usize {
        // No subscribers is not an error: nobody is listening yet.
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_BUS_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_all_subscribers() {
        let bus = EventBus::default();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        assert_eq!(bus.publish(PageEvent::named("htmx:load")), 2);
        assert_eq!(first.recv().await.unwrap().name, "htmx:load");
        assert_eq!(second.recv().await.unwrap().name, "htmx:load");
    }

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new(0);
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.publish(PageEvent::dom_content_loaded()), 0);
    }
}
