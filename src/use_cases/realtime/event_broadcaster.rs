use tokio::sync::broadcast;
use tracing::{event, Level};
use types::{BroadcastEvent, BroadcastItem};

use common::settings::types::Settings;

/// Fans newly created records out to every connected admin session.
///
/// Delivery is best effort: nothing is buffered for sessions that are not
/// connected when an event is published.
#[derive(Clone)]
pub struct EventBroadcaster {
    sender: broadcast::Sender<BroadcastEvent>,
}

impl EventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.broadcast.capacity)
    }

    /// Never blocks and never fails; returns how many sessions received it.
    pub fn publish(&self, broadcast_event: BroadcastEvent) -> usize {
        let event_name = broadcast_event.event_name();
        match self.sender.send(broadcast_event) {
            Ok(listeners) => {
                event!(Level::DEBUG, event_name, listeners, "broadcast event published");
                listeners
            }
            Err(_) => {
                event!(Level::DEBUG, event_name, "no listeners for broadcast event");
                0
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BroadcastEvent> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Call after a contact record has been durably created.
    pub fn announce_new_contact(&self, item: BroadcastItem) -> usize {
        self.publish(BroadcastEvent::NewContact { item })
    }

    /// Call after a subscriber record has been durably created.
    pub fn announce_new_subscriber(&self, item: BroadcastItem) -> usize {
        self.publish(BroadcastEvent::NewSubscriber { item })
    }
}
