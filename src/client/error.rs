use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum KeyDecodeError {
    #[error("key contains no base64url characters")]
    InvalidKey,
    #[error("key is not valid base64 after cleaning ({length} characters): {message}")]
    Malformed { length: usize, message: String },
}

/// Every failure a client-side step can surface. The `Display` text is what
/// ends up in the subscription manager's error slot.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClientError {
    #[error("Push notifications are not supported in this browser.")]
    UnsupportedEnvironment,
    #[error("Notification permission was denied.")]
    PermissionDenied,
    #[error("The application server key could not be decoded: {0}")]
    Decode(#[from] KeyDecodeError),
    #[error("Network error: {0}")]
    Network(String),
    #[error("The push service rejected the subscription: {0}")]
    Relay(String),
    #[error("Background worker error: {0}")]
    Worker(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Network(e.to_string())
    }
}
