use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const NEW_CONTACT: &str = "newContact";
pub const NEW_SUBSCRIBER: &str = "newSubscriber";

/// Live-update signal sent to connected admin sessions after a record has been
/// created in the authoritative store.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum BroadcastEvent {
    NewContact { item: BroadcastItem },
    NewSubscriber { item: BroadcastItem },
}

impl BroadcastEvent {
    pub fn event_name(&self) -> &'static str {
        match self {
            BroadcastEvent::NewContact { .. } => NEW_CONTACT,
            BroadcastEvent::NewSubscriber { .. } => NEW_SUBSCRIBER,
        }
    }

    pub fn item(&self) -> &BroadcastItem {
        match self {
            BroadcastEvent::NewContact { item } | BroadcastEvent::NewSubscriber { item } => item,
        }
    }

    pub fn into_item(self) -> BroadcastItem {
        match self {
            BroadcastEvent::NewContact { item } | BroadcastEvent::NewSubscriber { item } => item,
        }
    }
}

/// A created record: its identifier plus whatever fields the store returned.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BroadcastItem {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl BroadcastItem {
    pub fn new(id: impl ToString) -> Self {
        Self {
            id: id.to_string(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl ToString, value: impl Into<Value>) -> Self {
        self.fields.insert(key.to_string(), value.into());
        self
    }
}
