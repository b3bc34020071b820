mod admin_token;
mod push_subscription;

pub use admin_token::*;
pub use push_subscription::*;
