use thiserror::Error;

use super::client::agent_for;
use super::types::{ApiErrorBody, ChatCompletionRequest, ChatCompletionResponse, ChatRequestMessage};
use crate::config::Config;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("No API key configured. Set one with `glass-scribe set-key`.")]
    NoApiKey,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(String),

    #[error("Invalid API response: {0}")]
    Decode(String),

    #[error("No content in response")]
    EmptyResponse,
}

/// One system prompt + user message exchange.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_message: String,
}

/// Remote text generation. Opaque to the overlay: a string or an error comes back.
pub trait CompletionBackend: Send + Sync {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

/// OpenAI-compatible `/chat/completions` backend.
pub struct OpenAiCompletion {
    agent: ureq::Agent,
    api_key: String,
    base_url: String,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiCompletion {
    pub fn from_config(config: &Config) -> Self {
        Self {
            agent: agent_for(config),
            api_key: config.api_key.clone(),
            base_url: config.api_base_url.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl CompletionBackend for OpenAiCompletion {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        if self.api_key.trim().is_empty() {
            return Err(CompletionError::NoApiKey);
        }

        let payload = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatRequestMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatRequestMessage {
                    role: "user",
                    content: &request.user_message,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        tracing::debug!(model = %self.model, endpoint = %self.endpoint(), "sending completion request");

        let mut resp = self
            .agent
            .post(&self.endpoint())
            .header("Authorization", &format!("Bearer {}", self.api_key))
            .send_json(&payload)
            .map_err(|e| CompletionError::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if status == 401 {
            return Err(CompletionError::InvalidApiKey);
        }
        if !resp.status().is_success() {
            let body = resp.body_mut().read_to_string().unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Api { status, message });
        }

        let json: ChatCompletionResponse = resp
            .body_mut()
            .read_json()
            .map_err(|e| CompletionError::Decode(e.to_string()))?;

        let content = json
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        Ok(content)
    }
}
