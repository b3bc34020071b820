use chrono::Utc;
use entities::push_subscription;
use sea_orm::Set;
use uuid::Uuid;

use crate::{
    db::{digest_for_lookup, encrypt_and_encode},
    settings::types::Settings,
};

/// Browser-side keys from the RFC 8291 example, so the factory output can be
/// encrypted to.
pub const TEST_P256DH_KEY: &str =
    "BCVxsr7N_eNgVRqvHtD0zTZsEc6-VV-JvLexhqUzORcxaOzi6-AYWXvTBHm4bjyPjs7Vd8pZGH6SRpkNtoIAiw4";
pub const TEST_AUTH_KEY: &str = "BTBZMqHH6r4Tts7J_aSIgg";

pub fn push_subscription(settings: &Settings) -> push_subscription::ActiveModel {
    let now = Utc::now();
    push_subscription::ActiveModel {
        id: Set(Uuid::now_v7()),
        owner_id: Set(None),
        expiration_epoch_time: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .encrypt_and_save_endpoint(
        format!("https://relay.test/push/{}", Uuid::now_v7()),
        settings,
    )
    .encrypt_and_save_p256dh_key(TEST_P256DH_KEY.to_string(), settings)
    .encrypt_and_save_auth_key(TEST_AUTH_KEY.to_string(), settings)
}

pub trait PushSubscriptionFactory {
    fn owner_id(self, owner_id: Uuid) -> push_subscription::ActiveModel;
    fn encrypt_and_save_endpoint(
        self,
        endpoint: String,
        settings: &Settings,
    ) -> push_subscription::ActiveModel;
    fn encrypt_and_save_p256dh_key(
        self,
        p256dh_key: String,
        settings: &Settings,
    ) -> push_subscription::ActiveModel;
    fn encrypt_and_save_auth_key(
        self,
        auth_key: String,
        settings: &Settings,
    ) -> push_subscription::ActiveModel;
}

impl PushSubscriptionFactory for push_subscription::ActiveModel {
    fn owner_id(mut self, owner_id: Uuid) -> push_subscription::ActiveModel {
        self.owner_id = Set(Some(owner_id));
        self
    }

    fn encrypt_and_save_endpoint(
        mut self,
        endpoint: String,
        settings: &Settings,
    ) -> push_subscription::ActiveModel {
        self.endpoint_digest = Set(digest_for_lookup(&endpoint, settings).unwrap());
        self.endpoint = Set(encrypt_and_encode(endpoint, settings).unwrap());
        self
    }

    fn encrypt_and_save_p256dh_key(
        mut self,
        p256dh_key: String,
        settings: &Settings,
    ) -> push_subscription::ActiveModel {
        self.p256dh_key = Set(encrypt_and_encode(p256dh_key, settings).unwrap());
        self
    }

    fn encrypt_and_save_auth_key(
        mut self,
        auth_key: String,
        settings: &Settings,
    ) -> push_subscription::ActiveModel {
        self.auth_key = Set(encrypt_and_encode(auth_key, settings).unwrap());
        self
    }
}
