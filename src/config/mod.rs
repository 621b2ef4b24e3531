//! Configuration module for glass-scribe.
//!
//! - `types`: constants and serde default helpers
//! - `config_struct`: Config struct definition
//! - `defaults`: Config Default implementation
//! - `prompts`: action kinds, personas and system prompt templates
//! - `io`: config loading and saving

mod config_struct;
mod defaults;
mod io;
pub mod prompts;
mod types;

// Re-export public types for external use
pub use config_struct::Config;
pub use io::{get_config_path, load_config, load_config_from, save_config, save_config_to};
pub use types::API_KEY_ENV;
