use base64::{prelude::BASE64_URL_SAFE_NO_PAD, DecodeError, Engine};
use http::{
    header::{InvalidHeaderValue, AUTHORIZATION, CONTENT_ENCODING, CONTENT_TYPE},
    HeaderMap, HeaderValue, StatusCode,
};
use thiserror::Error;

use common::{db::decode_and_decrypt, settings::types::Settings};
use entities::push_subscription;
use types::PushPayload;

use super::{
    web_push_message_encryptor::{MessageEncryptor, MessageEncryptorError},
    web_push_vapid_signature_builder::{VapidSignatureBuilder, VapidSignatureBuilderError},
};

#[derive(Debug, Error)]
pub enum WebPushMessengerError {
    #[error("Error decrypting stored subscription: {0}")]
    StoredValueError(String),
    #[error("Base64DecodeError: {0}")]
    Base64DecodeError(DecodeError),
    #[error(transparent)]
    EncryptorError(#[from] MessageEncryptorError),
    #[error(transparent)]
    VapidError(#[from] VapidSignatureBuilderError),
    #[error("InvalidHeaderValue: {0}")]
    HeaderError(#[from] InvalidHeaderValue),
    #[error("Error serializing payload: {0}")]
    SerializeError(#[from] serde_json::Error),
    #[error("Error sending to push relay: {0}")]
    RequestError(#[from] reqwest::Error),
}

#[derive(Debug, PartialEq)]
pub enum WebPushMessengerResult {
    OK,
    /// The relay no longer knows the endpoint (404/410); the record should go.
    InvalidSubscription,
    Rejected(StatusCode),
}

/// Delivers one payload to one stored subscription.
pub struct WebPushMessenger<'a> {
    client: &'a reqwest::Client,
    endpoint: String,
    ttl_seconds: u64,
    message_encryptor: MessageEncryptor,
    vapid_signature_builder: VapidSignatureBuilder,
}

impl<'a> WebPushMessenger<'a> {
    pub fn new(
        client: &'a reqwest::Client,
        subscription: &push_subscription::Model,
        settings: &Settings,
    ) -> Result<Self, WebPushMessengerError> {
        let endpoint = decode_stored(&subscription.endpoint, settings)?;
        let p256dh_key = BASE64_URL_SAFE_NO_PAD
            .decode(decode_stored(&subscription.p256dh_key, settings)?)
            .map_err(|e| WebPushMessengerError::Base64DecodeError(e))?;
        let auth_key = BASE64_URL_SAFE_NO_PAD
            .decode(decode_stored(&subscription.auth_key, settings)?)
            .map_err(|e| WebPushMessengerError::Base64DecodeError(e))?;
        Ok(Self {
            client,
            endpoint,
            ttl_seconds: settings.push.ttl_seconds,
            message_encryptor: MessageEncryptor::new(&p256dh_key, &auth_key)?,
            vapid_signature_builder: VapidSignatureBuilder::new(settings)?,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn send_message(
        &self,
        payload: &PushPayload,
    ) -> Result<WebPushMessengerResult, WebPushMessengerError> {
        let encrypted_message = self.encrypt_message(payload)?;

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/octet-stream"),
        );
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(
                &self
                    .vapid_signature_builder
                    .build(&self.endpoint, self.ttl_seconds)?,
            )?,
        );
        headers.insert(CONTENT_ENCODING, HeaderValue::from_static("aes128gcm"));
        headers.insert("TTL", HeaderValue::from(self.ttl_seconds));
        headers.insert("Urgency", HeaderValue::from_static("normal"));

        let res = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .body(encrypted_message)
            .send()
            .await?;
        Ok(match res.status() {
            StatusCode::NOT_FOUND | StatusCode::GONE => WebPushMessengerResult::InvalidSubscription,
            status if status.is_success() => WebPushMessengerResult::OK,
            status => WebPushMessengerResult::Rejected(status),
        })
    }

    pub fn encrypt_message(
        &self,
        payload: &PushPayload,
    ) -> Result<Vec<u8>, WebPushMessengerError> {
        let message = serde_json::to_vec(payload)?;
        Ok(self.message_encryptor.encrypt(&message)?)
    }
}

fn decode_stored(value: &str, settings: &Settings) -> Result<String, WebPushMessengerError> {
    decode_and_decrypt(value.to_string(), settings)
        .map_err(|e| WebPushMessengerError::StoredValueError(e))
}
