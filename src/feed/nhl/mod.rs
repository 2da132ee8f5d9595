//! NHL web API score feed.

mod client;
mod config;
mod models;

pub use client::{NhlFeed, feed_date};
pub use config::{DEFAULT_BASE_URL, NhlConfig};
