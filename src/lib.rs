//! Fyyur Library
//!
//! Venue, artist and show booking. Exposes modules for integration testing.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod services;
pub mod state;
pub mod templates;
pub mod test_utils;
