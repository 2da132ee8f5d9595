//! TP-Link Kasa smart bulb over the local TCP protocol.

mod bulb;
mod config;
mod models;
mod protocol;

pub use bulb::KasaBulb;
pub use config::KasaConfig;
