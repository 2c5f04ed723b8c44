//! Cookie History: recently visited pages per user, kept in a single cookie.
//!
//! This library crate exposes all modules for use by the demo binary and integration tests.

pub mod config;
pub mod database;
pub mod managers;
pub mod services;
pub mod types;
