//! Overflow Server Library
//!
//! This library provides the HTTP surface of the overflow Q&A backend,
//! including configuration management, error handling, dependency wiring and
//! the axum router.

pub mod config;
pub mod errors;
pub mod server;

pub use config::{Dependencies, Settings};
pub use errors::ServerError;
