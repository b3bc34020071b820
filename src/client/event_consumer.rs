use std::future::Future;

use tracing::{event, Level};
use types::{BroadcastEvent, BroadcastItem};

use crate::ClientError;

/// An open live-update channel.
pub trait EventChannel {
    /// `None` once the channel has ended for good.
    fn next_event(&mut self) -> impl Future<Output = Option<BroadcastEvent>>;

    fn close(&mut self);
}

pub trait EventConnector {
    type Channel: EventChannel;

    fn connect(&self) -> Result<Self::Channel, ClientError>;
}

/// Admin dashboard state fed by live updates.
///
/// Holds at most one channel at a time and merges each announced record into
/// the matching list unless a record with the same `_id` is already there.
/// The channel is closed on [`disconnect`](Self::disconnect) and on drop.
pub struct AdminSession<C: EventConnector> {
    connector: C,
    channel: Option<C::Channel>,
    contacts: Vec<BroadcastItem>,
    subscribers: Vec<BroadcastItem>,
}

impl<C: EventConnector> AdminSession<C> {
    pub fn new(connector: C) -> Self {
        Self::with_records(connector, vec![], vec![])
    }

    /// Seeds the lists with records already loaded from the store.
    pub fn with_records(
        connector: C,
        contacts: Vec<BroadcastItem>,
        subscribers: Vec<BroadcastItem>,
    ) -> Self {
        Self {
            connector,
            channel: None,
            contacts,
            subscribers,
        }
    }

    /// Opens the channel. Returns `false` without opening a second one when
    /// already connected.
    pub fn connect(&mut self) -> Result<bool, ClientError> {
        if self.channel.is_some() {
            return Ok(false);
        }
        self.channel = Some(self.connector.connect()?);
        event!(Level::DEBUG, "Live updates connected");
        Ok(true)
    }

    pub fn is_connected(&self) -> bool {
        self.channel.is_some()
    }

    pub fn disconnect(&mut self) {
        if let Some(mut channel) = self.channel.take() {
            channel.close();
            event!(Level::DEBUG, "Live updates disconnected");
        }
    }

    pub fn contacts(&self) -> &[BroadcastItem] {
        &self.contacts
    }

    pub fn subscribers(&self) -> &[BroadcastItem] {
        &self.subscribers
    }

    /// Waits for the next event and merges it. `None` when not connected or
    /// once the channel has ended, after which the session is disconnected.
    pub async fn next(&mut self) -> Option<BroadcastEvent> {
        let broadcast_event = self.channel.as_mut()?.next_event().await;
        match broadcast_event {
            Some(broadcast_event) => {
                self.apply(&broadcast_event);
                Some(broadcast_event)
            }
            None => {
                self.disconnect();
                None
            }
        }
    }

    /// Returns whether the item was new.
    pub fn apply(&mut self, broadcast_event: &BroadcastEvent) -> bool {
        let list = match broadcast_event {
            BroadcastEvent::NewContact { .. } => &mut self.contacts,
            BroadcastEvent::NewSubscriber { .. } => &mut self.subscribers,
        };
        let item = broadcast_event.item();
        if list.iter().any(|existing| existing.id == item.id) {
            return false;
        }
        list.insert(0, item.clone());
        true
    }
}

impl<C: EventConnector> Drop for AdminSession<C> {
    fn drop(&mut self) {
        self.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    use super::*;

    #[derive(Default)]
    struct Log {
        opened: usize,
        closed: usize,
    }

    struct ScriptedChannel {
        events: VecDeque<BroadcastEvent>,
        log: Arc<Mutex<Log>>,
    }

    impl EventChannel for ScriptedChannel {
        async fn next_event(&mut self) -> Option<BroadcastEvent> {
            self.events.pop_front()
        }

        fn close(&mut self) {
            self.log.lock().unwrap().closed += 1;
        }
    }

    struct ScriptedConnector {
        events: Vec<BroadcastEvent>,
        log: Arc<Mutex<Log>>,
    }

    impl EventConnector for ScriptedConnector {
        type Channel = ScriptedChannel;

        fn connect(&self) -> Result<ScriptedChannel, ClientError> {
            self.log.lock().unwrap().opened += 1;
            Ok(ScriptedChannel {
                events: self.events.clone().into(),
                log: self.log.clone(),
            })
        }
    }

    fn contact(id: &str) -> BroadcastEvent {
        BroadcastEvent::NewContact {
            item: BroadcastItem::new(id).with_field("email", format!("{}@example.com", id)),
        }
    }

    fn session(events: Vec<BroadcastEvent>) -> (AdminSession<ScriptedConnector>, Arc<Mutex<Log>>) {
        let log = Arc::new(Mutex::new(Log::default()));
        let session = AdminSession::new(ScriptedConnector {
            events,
            log: log.clone(),
        });
        (session, log)
    }

    #[tokio::test]
    async fn duplicate_ids_are_merged_once() {
        let (mut session, _log) = session(vec![
            contact("A"),
            contact("A"),
            BroadcastEvent::NewSubscriber {
                item: BroadcastItem::new("A"),
            },
        ]);
        session.connect().unwrap();

        while session.next().await.is_some() {}

        assert_eq!(session.contacts().len(), 1);
        assert_eq!(session.contacts()[0].id, "A");
        assert_eq!(session.subscribers().len(), 1);
    }

    #[tokio::test]
    async fn newest_records_come_first() {
        let (mut session, _log) = session(vec![contact("A"), contact("B")]);
        session.connect().unwrap();

        while session.next().await.is_some() {}

        let ids: Vec<&str> = session.contacts().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A"]);
    }

    #[test]
    fn seeded_records_are_not_duplicated() {
        let log = Arc::new(Mutex::new(Log::default()));
        let mut session = AdminSession::with_records(
            ScriptedConnector {
                events: vec![],
                log,
            },
            vec![BroadcastItem::new("A")],
            vec![],
        );

        assert!(!session.apply(&contact("A")));
        assert!(session.apply(&contact("B")));
        assert_eq!(session.contacts().len(), 2);
    }

    #[test]
    fn second_connect_is_a_no_op() {
        let (mut session, log) = session(vec![]);

        assert!(session.connect().unwrap());
        assert!(!session.connect().unwrap());

        assert_eq!(log.lock().unwrap().opened, 1);
    }

    #[tokio::test]
    async fn ended_channel_disconnects() {
        let (mut session, log) = session(vec![contact("A")]);
        session.connect().unwrap();

        assert!(session.next().await.is_some());
        assert!(session.next().await.is_none());

        assert!(!session.is_connected());
        assert_eq!(log.lock().unwrap().closed, 1);
        assert!(session.next().await.is_none());
    }

    #[test]
    fn drop_closes_channel() {
        let (mut session, log) = session(vec![]);
        session.connect().unwrap();

        drop(session);

        assert_eq!(log.lock().unwrap().closed, 1);
    }
}
