//! Library crate for goal-light, exposing modules for the binary and tests.

pub mod config;
pub mod device;
pub mod feed;
pub mod services;
pub mod state;

#[cfg(test)]
mod test_support;
