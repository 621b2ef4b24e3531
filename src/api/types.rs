use serde::{Deserialize, Serialize};

#[derive(Serialize, Debug)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatRequestMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Serialize, Debug)]
pub struct ChatRequestMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
}

/// Error body returned by OpenAI-compatible servers.
#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorDetail {
    pub message: String,
}
