//! glass-scribe: a selection-triggered text transformation overlay.
//!
//! - `overlay`: trigger, highlight and panel state machine over a [`overlay::HostSurface`]
//! - `api`: OpenAI-compatible completion backend
//! - `config`: persisted settings, personas and prompt templates
//! - `replay`: scripted sessions against the headless surface

pub mod api;
pub mod config;
pub mod overlay;
pub mod replay;
