//! Configuration module for the overflow server.
//! Reads settings from the environment and wires up the application state.
mod cors;
mod dependencies;
mod settings;

pub use cors::create_cors_layer;
pub use dependencies::Dependencies;
pub use settings::{LogFormat, Settings, StoreKind};
