pub mod public_key;
pub mod push_subscription;
pub mod web_push_messenger;
