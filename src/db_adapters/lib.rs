mod notification;

pub use notification::push_subscription_adapter;
pub use sea_orm::Order;
