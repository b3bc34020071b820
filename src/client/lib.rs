//! Client-resident half of the notification layer: the push subscription
//! controller, the background cache worker and the admin live-update
//! consumer. Browser facilities are reached through the traits in
//! [`platform`], so every component runs against fakes in tests.

mod error;
pub mod event_consumer;
pub mod http_api;
pub mod key_codec;
pub mod platform;
pub mod sse;
pub mod subscription_manager;
pub mod worker;

pub use error::{ClientError, KeyDecodeError};
