//! Core system foundations
//!
//! Configuration, logging, shared application state and the factory that
//! wires them together.

pub mod app_state;
pub mod config;
pub mod factory;
pub mod logging;

// Re-export commonly used items
pub use app_state::AppState;
pub use config::{load_config, load_config_or_default, Config, ConfigSource};
pub use factory::{create_app_state, create_app_state_with};
