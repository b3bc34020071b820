use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Wire shape of a push message body. Every field is optional; the receiving
/// worker fills in defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PushPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PushData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vibrate: Option<Vec<u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<NotificationAction>>,
}

/// Opaque data bag attached to a notification. Only `url` is interpreted.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PushData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}
