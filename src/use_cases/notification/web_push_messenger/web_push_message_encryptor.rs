use aes_gcm::{
    aead::{consts as aes_gcm_consts, rand_core::RngCore, AeadInPlace, Error as AEADError, OsRng},
    Aes128Gcm, Key, KeyInit, Nonce,
};
use hkdf::Hkdf;
use p256::{
    ecdh::diffie_hellman,
    elliptic_curve::{sec1::ToEncodedPoint, Error as P256Error},
    PublicKey, SecretKey,
};
use sha2::Sha256;
use thiserror::Error;

pub(crate) const P256DH_KEY_LENGTH: usize = 65;
pub(crate) const AUTH_KEY_LENGTH: usize = 16;
const SALT_LENGTH: usize = 16;
const TAG_LENGTH: usize = 16;
const LAST_RECORD_DELIMITER: u8 = 0x02;

#[derive(Debug, Error)]
pub enum MessageEncryptorError {
    #[error("InvalidP256DHKey: {0}")]
    InvalidP256DHKey(P256Error),
    #[error("InvalidAuthKey: expected 16 bytes, got {0}")]
    InvalidAuthKey(usize),
    #[error("Aes128GcmEncryptError: {0}")]
    Aes128GcmEncryptError(AEADError),
    #[error("InternalError: {0}")]
    InternalError(String),
}

/// Encrypts push payloads for one subscriber with the `aes128gcm` content
/// coding (RFC 8188) keyed as described in RFC 8291.
///
/// The whole payload goes into a single record, so the output is
/// `salt(16) | rs(4) | idlen(1) | keyid(65) | ciphertext`.
pub struct MessageEncryptor {
    p256dh_key: PublicKey,
    auth_key: [u8; AUTH_KEY_LENGTH],
}

impl MessageEncryptor {
    pub fn new(p256dh_key: &[u8], auth_key: &[u8]) -> Result<Self, MessageEncryptorError> {
        let p256dh_key = PublicKey::from_sec1_bytes(p256dh_key)
            .map_err(|e| MessageEncryptorError::InvalidP256DHKey(e))?;
        let auth_key: [u8; AUTH_KEY_LENGTH] = auth_key
            .try_into()
            .map_err(|_| MessageEncryptorError::InvalidAuthKey(auth_key.len()))?;
        Ok(Self {
            p256dh_key,
            auth_key,
        })
    }

    pub fn encrypt(&self, message: &[u8]) -> Result<Vec<u8>, MessageEncryptorError> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng.fill_bytes(&mut salt);

        let as_secret = SecretKey::random(&mut OsRng);
        let as_public = as_secret.public_key().as_affine().to_encoded_point(false);
        let ua_public = self.p256dh_key.as_affine().to_encoded_point(false);

        let mut info = Vec::with_capacity(14 + 2 * P256DH_KEY_LENGTH);
        info.extend_from_slice(b"WebPush: info\0");
        info.extend_from_slice(ua_public.as_bytes());
        info.extend_from_slice(as_public.as_bytes());

        let shared = diffie_hellman(as_secret.to_nonzero_scalar(), self.p256dh_key.as_affine());
        let mut ikm = [0u8; 32];
        Hkdf::<Sha256>::new(Some(&self.auth_key), shared.raw_secret_bytes().as_slice())
            .expand(&info, &mut ikm)
            .map_err(|e| MessageEncryptorError::InternalError(e.to_string()))?;

        let record_size: u32 = (message.len() + 1 + TAG_LENGTH).try_into().map_err(|e| {
            MessageEncryptorError::InternalError(format!("Invalid message length: {:?}", e))
        })?;
        let key_id_length: u8 = as_public.len().try_into().map_err(|e| {
            MessageEncryptorError::InternalError(format!("Invalid key_id length: {:?}", e))
        })?;

        let key = derive_key(&salt, &ikm)?;
        let nonce = derive_nonce(&salt, &ikm)?;

        let mut record = Vec::with_capacity(record_size as usize);
        record.extend_from_slice(message);
        record.push(LAST_RECORD_DELIMITER);
        Aes128Gcm::new(&key)
            .encrypt_in_place(&nonce, b"", &mut record)
            .map_err(|e| MessageEncryptorError::Aes128GcmEncryptError(e))?;

        let mut output = Vec::with_capacity(SALT_LENGTH + 5 + as_public.len() + record.len());
        output.extend_from_slice(&salt);
        output.extend_from_slice(&record_size.to_be_bytes());
        output.push(key_id_length);
        output.extend_from_slice(as_public.as_bytes());
        output.extend_from_slice(&record);
        Ok(output)
    }
}

fn derive_key(salt: &[u8], ikm: &[u8]) -> Result<Key<Aes128Gcm>, MessageEncryptorError> {
    let mut okm = [0u8; 16];
    Hkdf::<Sha256>::new(Some(salt), ikm)
        .expand(b"Content-Encoding: aes128gcm\0", &mut okm)
        .map_err(|e| MessageEncryptorError::InternalError(e.to_string()))?;
    Ok(Key::<Aes128Gcm>::from(okm))
}

// Single record, so the sequence number XORed into the nonce is always zero.
fn derive_nonce(
    salt: &[u8],
    ikm: &[u8],
) -> Result<Nonce<aes_gcm_consts::U12>, MessageEncryptorError> {
    let mut okm = [0u8; 12];
    Hkdf::<Sha256>::new(Some(salt), ikm)
        .expand(b"Content-Encoding: nonce\0", &mut okm)
        .map_err(|e| MessageEncryptorError::InternalError(e.to_string()))?;
    Ok(Nonce::from(okm))
}
