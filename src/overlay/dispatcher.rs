use thiserror::Error;

use crate::api::{CompletionError, CompletionRequest};
use crate::config::prompts::{
    build_user_message, find_persona, resolve_system_prompt, ActionKind, DEFAULT_PERSONA,
};

#[derive(Debug, Error, PartialEq)]
pub enum DispatchError {
    #[error("Another action is already running: {0:?}")]
    Busy(ActionKind),

    #[error("No text selected")]
    NoSource,

    #[error("No custom prompt entered")]
    EmptyInstruction,

    #[error("No API key configured. Set one with `glass-scribe set-key`.")]
    NoCredential,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionRequest {
    pub kind: ActionKind,
    pub source_text: String,
    pub custom_instruction: Option<String>,
    pub persona: String,
}

impl ActionRequest {
    pub fn to_completion(&self) -> CompletionRequest {
        let instruction = self.custom_instruction.as_deref();
        CompletionRequest {
            system_prompt: resolve_system_prompt(self.kind, &self.persona, instruction)
                .to_string(),
            user_message: build_user_message(&self.source_text, instruction),
        }
    }
}

/// Which panel a completion belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompletionTicket {
    pub panel_generation: u64,
    pub kind: ActionKind,
}

/// A request the host must run and report back.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingCompletion {
    pub ticket: CompletionTicket,
    pub request: CompletionRequest,
}

/// Turns panel actions into completion requests, one at a time.
#[derive(Debug)]
pub struct ActionDispatcher {
    processing: Option<ActionKind>,
    persona: String,
    has_credential: bool,
}

impl ActionDispatcher {
    pub fn new(persona: &str, has_credential: bool) -> Self {
        let persona = if find_persona(persona).is_some() {
            persona
        } else {
            DEFAULT_PERSONA
        };
        Self {
            processing: None,
            persona: persona.to_string(),
            has_credential,
        }
    }

    pub fn processing(&self) -> Option<ActionKind> {
        self.processing
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    /// Returns false for unknown persona ids.
    pub fn set_persona(&mut self, id: &str) -> bool {
        if find_persona(id).is_none() {
            return false;
        }
        self.persona = id.to_string();
        true
    }

    pub fn set_credential(&mut self, present: bool) {
        self.has_credential = present;
    }

    pub fn begin(
        &mut self,
        kind: ActionKind,
        source_text: &str,
        custom_instruction: Option<&str>,
        panel_generation: u64,
    ) -> Result<PendingCompletion, DispatchError> {
        if let Some(running) = self.processing {
            return Err(DispatchError::Busy(running));
        }
        if source_text.trim().is_empty() {
            return Err(DispatchError::NoSource);
        }
        let custom_instruction = match custom_instruction.map(str::trim) {
            Some("") => return Err(DispatchError::EmptyInstruction),
            None if kind == ActionKind::Custom => return Err(DispatchError::EmptyInstruction),
            other => other,
        };
        if !self.has_credential {
            return Err(DispatchError::NoCredential);
        }

        let request = ActionRequest {
            kind,
            source_text: source_text.to_string(),
            custom_instruction: custom_instruction.map(str::to_string),
            persona: self.persona.clone(),
        };
        self.processing = Some(kind);
        tracing::info!(?kind, persona = %self.persona, "dispatching action");
        Ok(PendingCompletion {
            ticket: CompletionTicket {
                panel_generation,
                kind,
            },
            request: request.to_completion(),
        })
    }

    pub fn finish(&mut self) {
        self.processing = None;
    }
}

/// Text written into the panel for a completion outcome.
pub fn render_outcome(outcome: Result<String, CompletionError>) -> String {
    match outcome {
        Ok(text) => text,
        Err(e) => format!("Error: {}", e),
    }
}
