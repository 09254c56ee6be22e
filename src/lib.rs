pub mod auction;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod event_store;
pub mod handlers;
pub mod listing;
pub mod message_broker;
pub mod preference;
pub mod query;
pub mod scheduler;
pub mod seed;
pub mod state;
