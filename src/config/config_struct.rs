//! Config struct definition.

use serde::{Deserialize, Serialize};

use super::types::{
    default_api_base_url, default_max_tokens, default_model, default_persona,
    default_temperature, default_timeout_secs,
};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Persona preselected when a panel opens.
    #[serde(default = "default_persona")]
    pub persona: String,
}

impl Config {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}
