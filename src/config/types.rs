//! Serde default helpers for config fields.

use super::prompts::DEFAULT_PERSONA;

// --- CONSTANTS ---
pub const DEFAULT_API_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "GLASS_SCRIBE_API_KEY";

pub fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
pub fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
pub fn default_max_tokens() -> u32 {
    1000
}
pub fn default_temperature() -> f32 {
    0.7
}
pub fn default_timeout_secs() -> u64 {
    120
}
pub fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}
