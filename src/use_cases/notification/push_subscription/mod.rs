pub mod subscribe;
pub mod types;
pub mod unsubscribe;
