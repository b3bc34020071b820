use pasetors::{claims::Claims, keys::SymmetricKey, local, version4::V4};
use uuid::Uuid;

use crate::settings::types::Settings;

/// Issues a bearer token the way the admin auth service does.
pub fn admin_token(admin_id: Uuid, settings: &Settings) -> String {
    let mut claims = Claims::new().unwrap();
    claims
        .add_additional("admin_id", serde_json::json!(admin_id))
        .unwrap();

    let sk = SymmetricKey::<V4>::from(settings.secret.secret_key.as_bytes()).unwrap();
    local::encrypt(
        &sk,
        &claims,
        None,
        Some(settings.secret.hmac_secret.as_bytes()),
    )
    .unwrap()
}
