mod web_push_message_encryptor;
mod web_push_messenger;
mod web_push_vapid_signature_builder;

pub(crate) use web_push_message_encryptor::{AUTH_KEY_LENGTH, P256DH_KEY_LENGTH};
pub use web_push_message_encryptor::{MessageEncryptor, MessageEncryptorError};
pub use web_push_messenger::{WebPushMessenger, WebPushMessengerError, WebPushMessengerResult};
pub use web_push_vapid_signature_builder::{VapidSignatureBuilder, VapidSignatureBuilderError};
