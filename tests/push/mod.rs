mod public_key;
mod subscribe;
mod unsubscribe;
