use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// The shape a browser produces from `PushSubscription.toJSON()`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionJson {
    pub endpoint: String,
    #[serde(default)]
    pub expiration_time: Option<i64>,
    pub keys: PushSubscriptionKeys,
}

/// Per-subscription encryption keys, both base64url without padding.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PushSubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct PushUnsubscribeRequest {
    pub endpoint: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyResponse {
    pub public_key: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PushSubscriptionVisible {
    pub endpoint: String,
    pub expiration_time: Option<i64>,
    pub created_at: DateTime<FixedOffset>,
}
