use pasetors::{
    claims::ClaimsValidationRules, keys::SymmetricKey, local, token::UntrustedToken,
    version4::V4, Local,
};
use uuid::Uuid;

use common::settings::types::Settings;

const ADMIN_ID_CLAIM: &str = "admin_id";

/// Decrypts a bearer token issued by the admin auth service and returns the
/// admin it was issued to. Expiry and not-before are enforced.
#[tracing::instrument(name = "Verifying admin token", skip(token, settings))]
pub fn verify_admin_token(token: &str, settings: &Settings) -> Result<Uuid, String> {
    let sk = SymmetricKey::<V4>::from(settings.secret.secret_key.as_bytes())
        .map_err(|e| format!("Invalid secret_key: {}", e))?;
    let untrusted_token = UntrustedToken::<Local, V4>::try_from(token)
        .map_err(|e| format!("Malformed token: {}", e))?;
    let trusted_token = local::decrypt(
        &sk,
        &untrusted_token,
        &ClaimsValidationRules::new(),
        None,
        Some(settings.secret.hmac_secret.as_bytes()),
    )
    .map_err(|e| format!("Token rejected: {}", e))?;

    let claims = trusted_token
        .payload_claims()
        .ok_or_else(|| "Token has no claims".to_string())?;
    let admin_id = claims
        .get_claim(ADMIN_ID_CLAIM)
        .and_then(|value| value.as_str())
        .ok_or_else(|| format!("Token has no {} claim", ADMIN_ID_CLAIM))?;
    Uuid::parse_str(admin_id).map_err(|e| format!("Invalid {}: {}", ADMIN_ID_CLAIM, e))
}
