//! Config I/O operations: load, save and the API key override.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::config_struct::Config;
use crate::config::prompts::{find_persona, DEFAULT_PERSONA};
use crate::config::types::API_KEY_ENV;

// ============================================================================
// CONFIG PATH
// ============================================================================

/// Get the config file path
pub fn get_config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_default()
        .join("glass-scribe");
    let _ = std::fs::create_dir_all(&config_dir);
    config_dir.join("config.json")
}

// ============================================================================
// CONFIG LOADING
// ============================================================================

/// Load config from the default location, applying the env override
pub fn load_config() -> Config {
    let mut config = load_config_from(&get_config_path());
    apply_env_override(&mut config, std::env::var(API_KEY_ENV).ok());
    config
}

/// Load config from `path`. Missing or unreadable files yield defaults.
pub fn load_config_from(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }

    let data = match std::fs::read_to_string(path) {
        Ok(d) => d,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config unreadable, using defaults");
            return Config::default();
        }
    };

    let mut config: Config = match serde_json::from_str(&data) {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "config corrupt, using defaults");
            return Config::default();
        }
    };

    migrate_config(&mut config);
    config
}

fn apply_env_override(config: &mut Config, env_key: Option<String>) {
    if let Some(key) = env_key.filter(|k| !k.trim().is_empty()) {
        config.api_key = key;
    }
}

/// Normalize values an older or hand-edited file may carry
fn migrate_config(config: &mut Config) {
    config.api_key = config.api_key.trim().to_string();

    if find_persona(&config.persona).is_none() {
        tracing::warn!(persona = %config.persona, "unknown persona in config, resetting");
        config.persona = DEFAULT_PERSONA.to_string();
    }

    while config.api_base_url.ends_with('/') {
        config.api_base_url.pop();
    }
}

// ============================================================================
// CONFIG SAVING
// ============================================================================

/// Save config to the default location
pub fn save_config(config: &Config) -> Result<()> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<()> {
    let data = serde_json::to_string_pretty(config)?;
    std::fs::write(path, data)
        .with_context(|| format!("Failed to write config to {}", path.display()))
}
