mod events;
mod push_test;
