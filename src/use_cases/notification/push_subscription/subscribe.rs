use base64::{prelude::BASE64_URL_SAFE_NO_PAD, Engine};
use http::Uri;
use uuid::Uuid;

use common::{
    db::{digest_for_lookup, encrypt_and_encode},
    settings::types::Settings,
};
use db_adapters::push_subscription_adapter::{
    PushSubscriptionAdapter, PushSubscriptionMutation, UpsertOutcome,
    UpsertPushSubscriptionParams,
};
use types::PushSubscriptionJson;

use crate::{
    error_500,
    notification::{
        push_subscription::types::{visible, SubscribeOutcome},
        web_push_messenger::{MessageEncryptor, AUTH_KEY_LENGTH, P256DH_KEY_LENGTH},
    },
    UseCaseError,
};

/// Stores the subscription, or refreshes the record already held for its
/// endpoint. An anonymous re-subscribe keeps the previous owner.
pub async fn subscribe_push<'a>(
    owner_id: Option<Uuid>,
    settings: &Settings,
    params: PushSubscriptionJson,
    push_subscription_adapter: PushSubscriptionAdapter<'a>,
) -> Result<SubscribeOutcome, UseCaseError> {
    validate_endpoint(&params.endpoint)?;
    let p256dh_key = decode_key("p256dh", &params.keys.p256dh, P256DH_KEY_LENGTH)?;
    let auth_key = decode_key("auth", &params.keys.auth, AUTH_KEY_LENGTH)?;
    MessageEncryptor::new(&p256dh_key, &auth_key)
        .map_err(|e| UseCaseError::BadRequest(format!("keys are not usable: {}", e)))?;

    let outcome = push_subscription_adapter
        .upsert(UpsertPushSubscriptionParams {
            endpoint_digest: digest_for_lookup(&params.endpoint, settings).map_err(error_500)?,
            endpoint: encrypt_and_encode(params.endpoint.clone(), settings).map_err(error_500)?,
            p256dh_key: encrypt_and_encode(BASE64_URL_SAFE_NO_PAD.encode(&p256dh_key), settings)
                .map_err(error_500)?,
            auth_key: encrypt_and_encode(BASE64_URL_SAFE_NO_PAD.encode(&auth_key), settings)
                .map_err(error_500)?,
            owner_id,
            expiration_epoch_time: params.expiration_time,
        })
        .await
        .map_err(error_500)?;

    Ok(SubscribeOutcome {
        subscription: visible(outcome.model(), params.endpoint),
        created: matches!(outcome, UpsertOutcome::Created(_)),
    })
}

fn validate_endpoint(endpoint: &str) -> Result<(), UseCaseError> {
    let invalid =
        || UseCaseError::BadRequest("endpoint must be an absolute http(s) URL.".to_string());
    let uri: Uri = endpoint.parse().map_err(|_| invalid())?;
    match (uri.scheme_str(), uri.host()) {
        (Some("https") | Some("http"), Some(host)) if !host.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

fn decode_key(name: &str, value: &str, expected_length: usize) -> Result<Vec<u8>, UseCaseError> {
    let decoded = BASE64_URL_SAFE_NO_PAD
        .decode(value.trim().trim_end_matches('='))
        .map_err(|e| UseCaseError::BadRequest(format!("keys.{} is not base64url: {}", name, e)))?;
    if decoded.len() != expected_length {
        return Err(UseCaseError::BadRequest(format!(
            "keys.{} must decode to {} bytes, got {}.",
            name,
            expected_length,
            decoded.len()
        )));
    }
    Ok(decoded)
}
