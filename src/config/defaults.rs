//! Config Default implementation.

use super::config_struct::Config;
use super::types::{
    default_api_base_url, default_max_tokens, default_model, default_persona,
    default_temperature, default_timeout_secs,
};

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base_url: default_api_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            persona: default_persona(),
        }
    }
}
