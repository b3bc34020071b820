use entities::push_subscription;
use serde::Serialize;
use types::PushSubscriptionVisible;

pub struct SubscribeOutcome {
    pub subscription: PushSubscriptionVisible,
    pub created: bool,
}

#[derive(Serialize, Debug, Default, PartialEq)]
pub struct PushTestReport {
    pub sent: usize,
    pub expired: usize,
    pub failed: usize,
}

pub(crate) fn visible(
    model: &push_subscription::Model,
    endpoint: String,
) -> PushSubscriptionVisible {
    PushSubscriptionVisible {
        endpoint,
        expiration_time: model.expiration_epoch_time,
        created_at: model.created_at,
    }
}
