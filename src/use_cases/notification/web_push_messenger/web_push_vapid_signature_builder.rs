use base64::{prelude::BASE64_URL_SAFE_NO_PAD, DecodeError, Engine};
use http::{uri::InvalidUri, Uri};
use jwt_simple::{
    prelude::{Claims, Duration, ECDSAP256KeyPairLike, ECDSAP256PublicKeyLike, ES256KeyPair},
    Error as JWTGenericError,
};
use thiserror::Error;

use common::settings::types::Settings;

/// Relays reject tokens that live longer than 24 hours.
const MAX_JWT_TTL_SECONDS: u64 = 60 * 60 * 23;

#[derive(Debug, Error)]
pub enum VapidSignatureBuilderError {
    #[error("Base64DecodeError: {0}")]
    Base64DecodeError(DecodeError),
    #[error("EndpointParseError: {0}")]
    EndpointParseError(InvalidUri),
    #[error("Endpoint has no origin: {0}")]
    MissingOrigin(String),
    #[error("Error parsing vapid_private_key: {0}")]
    VapidKeyParseError(JWTGenericError),
    #[error("Error generating vapid signature: {0}")]
    SigningError(JWTGenericError),
}

pub struct VapidSignatureBuilder {
    vapid_key: ES256KeyPair,
    app_owner_email: String,
}

impl VapidSignatureBuilder {
    pub fn new(settings: &Settings) -> Result<Self, VapidSignatureBuilderError> {
        let vapid_private_key = BASE64_URL_SAFE_NO_PAD
            .decode(
                settings
                    .application
                    .vapid_private_key
                    .trim()
                    .trim_end_matches('='),
            )
            .map_err(|e| VapidSignatureBuilderError::Base64DecodeError(e))?;
        Ok(Self {
            vapid_key: ES256KeyPair::from_bytes(&vapid_private_key)
                .map_err(|e| VapidSignatureBuilderError::VapidKeyParseError(e))?,
            app_owner_email: settings.application.app_owner_email.clone(),
        })
    }

    /// Uncompressed SEC1 point, the form browsers take as `applicationServerKey`.
    pub fn public_key(&self) -> String {
        BASE64_URL_SAFE_NO_PAD.encode(
            self.vapid_key
                .public_key()
                .public_key()
                .to_bytes_uncompressed(),
        )
    }

    fn build_jwt(
        &self,
        endpoint: Uri,
        ttl_seconds: u64,
    ) -> Result<String, VapidSignatureBuilderError> {
        let audience = match (endpoint.scheme_str(), endpoint.authority()) {
            (Some(scheme), Some(authority)) => format!("{}://{}", scheme, authority),
            _ => {
                return Err(VapidSignatureBuilderError::MissingOrigin(
                    endpoint.to_string(),
                ))
            }
        };
        let valid_for = Duration::from_secs(ttl_seconds.min(MAX_JWT_TTL_SECONDS));
        let jwt_claims = Claims::create(valid_for)
            .with_audience(audience)
            .with_subject(format!("mailto:{}", &self.app_owner_email));
        self.vapid_key
            .sign(jwt_claims)
            .map_err(|e| VapidSignatureBuilderError::SigningError(e))
    }

    pub fn build(
        &self,
        endpoint: &str,
        ttl_seconds: u64,
    ) -> Result<String, VapidSignatureBuilderError> {
        let jwt = self.build_jwt(
            endpoint
                .parse()
                .map_err(|e| VapidSignatureBuilderError::EndpointParseError(e))?,
            ttl_seconds,
        )?;

        Ok(format!("vapid t={}, k={}", jwt, self.public_key()))
    }
}
