mod broadcast_events;
mod push_payloads;
mod push_subscriptions;

pub use broadcast_events::{BroadcastEvent, BroadcastItem, NEW_CONTACT, NEW_SUBSCRIBER};
pub use push_payloads::{NotificationAction, PushData, PushPayload};
pub use push_subscriptions::{
    PublicKeyResponse, PushSubscriptionJson, PushSubscriptionKeys, PushSubscriptionVisible,
    PushUnsubscribeRequest,
};
