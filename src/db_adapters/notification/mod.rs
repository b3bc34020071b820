pub mod push_subscription_adapter;
