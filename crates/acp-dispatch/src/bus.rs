//! In-process event bus.
//!
//! Fan-out over a tokio broadcast channel: every subscriber gets its own
//! buffered receiver, so a slow consumer never stalls `publish` or the
//! other subscribers. Dropping the receiver removes the subscription.
//! Events published while there are zero subscribers are dropped.

use acp_core::Event;
use tokio::sync::broadcast;

/// Capacity of each subscriber's buffer. A receiver that falls further
/// behind than this observes a `Lagged` error and resumes from the oldest
/// retained event.
const CHANNEL_CAPACITY: usize = 256;

/// Shared publish/subscribe handle. Cloning is cheap.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Fire-and-forget: the
    /// send error when no subscriber exists is ignored.
    pub fn publish(&self, event: Event) {
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
