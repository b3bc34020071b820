use base64::{
    prelude::{BASE64_STANDARD, BASE64_URL_SAFE_NO_PAD},
    Engine,
};

use crate::KeyDecodeError;

fn is_base64url(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Turns a base64url public key, as served by the server or pasted from an
/// environment variable, into the raw bytes a push subscription needs.
///
/// Anything outside the base64url alphabet is dropped first, which covers
/// stray whitespace, newlines and `=` padding.
pub fn decode_application_key(input: &str) -> Result<Vec<u8>, KeyDecodeError> {
    let cleaned: String = input.chars().filter(|c| is_base64url(*c)).collect();
    if cleaned.is_empty() {
        return Err(KeyDecodeError::InvalidKey);
    }

    let mut standard: String = cleaned
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            c => c,
        })
        .collect();
    while standard.len() % 4 != 0 {
        standard.push('=');
    }

    BASE64_STANDARD
        .decode(standard)
        .map_err(|e| KeyDecodeError::Malformed {
            length: cleaned.len(),
            message: e.to_string(),
        })
}

pub fn encode_application_key(bytes: &[u8]) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes)
}
