use lazy_static::lazy_static;
use std::time::Duration;

use crate::config::Config;

const DEFAULT_TIMEOUT_SECS: u64 = 120;

lazy_static! {
    pub static ref UREQ_AGENT: ureq::Agent = build_agent(DEFAULT_TIMEOUT_SECS);
}

pub fn build_agent(timeout_secs: u64) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(Duration::from_secs(timeout_secs)))
        // Error bodies carry the server's message; status is checked by the caller.
        .http_status_as_error(false)
        .build();
    config.into()
}

/// Shared agent unless the config asks for a different timeout.
pub fn agent_for(config: &Config) -> ureq::Agent {
    if config.timeout_secs == DEFAULT_TIMEOUT_SECS {
        UREQ_AGENT.clone()
    } else {
        build_agent(config.timeout_secs)
    }
}
