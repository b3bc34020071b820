use aes_gcm::{
    aead::{Aead, AeadCore, OsRng},
    Aes256Gcm, KeyInit, Nonce,
};
use base64::{engine::general_purpose, Engine};
use sha2::{Digest, Sha256};

use crate::settings::types::Settings;

const NONCE_LENGTH: usize = 12;

fn get_key(settings: &Settings) -> Result<Vec<u8>, String> {
    general_purpose::STANDARD
        .decode(&settings.database.encryption_key)
        .map_err(|e| format!("Error base64-decoding encryption_key: {}", e))
}

fn get_cipher(settings: &Settings) -> Result<Aes256Gcm, String> {
    let key = get_key(settings)?;
    Aes256Gcm::new_from_slice(&key).map_err(|e| format!("Invalid encryption_key: {}", e))
}

/// Encrypts with a fresh nonce; the nonce is stored in front of the cipher text.
pub fn encrypt_and_encode(text: String, settings: &Settings) -> Result<String, String> {
    let cipher = get_cipher(settings)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let cipher_text = cipher
        .encrypt(&nonce, text.as_bytes())
        .map_err(|e| format!("Error encrypting text: {}", e))?;
    let mut stored = nonce.to_vec();
    stored.extend_from_slice(&cipher_text);
    Ok(general_purpose::STANDARD.encode(stored))
}

pub fn decode_and_decrypt(cipher_text: String, settings: &Settings) -> Result<String, String> {
    let cipher = get_cipher(settings)?;
    let decoded = general_purpose::STANDARD
        .decode(cipher_text)
        .map_err(|e| format!("Error base64-decoding cipher_text: {}", e))?;
    if decoded.len() <= NONCE_LENGTH {
        return Err("Error decrypting cipher_text: too short".to_string());
    }
    let (nonce, cipher_text) = decoded.split_at(NONCE_LENGTH);
    let plain_text = cipher
        .decrypt(Nonce::from_slice(nonce), cipher_text)
        .map_err(|e| format!("Error decrypting cipher_text: {}", e))?;
    String::from_utf8(plain_text)
        .map_err(|e| format!("Error utf8-encoding decrypted text: {}", e.utf8_error()))
}

/// Keyed digest used to find a row by a value that is stored encrypted.
pub fn digest_for_lookup(text: &str, settings: &Settings) -> Result<String, String> {
    let key = get_key(settings)?;
    let digest = Sha256::new()
        .chain_update(&key)
        .chain_update(text.as_bytes())
        .finalize();
    Ok(general_purpose::STANDARD.encode(digest))
}
