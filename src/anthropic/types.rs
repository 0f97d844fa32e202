//! Wire format of the Messages endpoint, limited to what the generator sends
//! and reads back.

use serde::{Deserialize, Serialize};

use crate::traits::{Completion, Prompt, StopReason, Usage};

/// Speaker of a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The caller.
    User,
    /// The model.
    Assistant,
}

/// One message of the request body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ApiMessage {
    /// Speaker.
    pub role: Role,
    /// Plain-text content.
    pub content: String,
}

/// Body of `POST /messages`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiRequest {
    /// Model identifier.
    pub model: String,
    /// Output token limit.
    pub max_tokens: u32,
    /// System prompt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Conversation; generator prompts are a single user turn.
    pub messages: Vec<ApiMessage>,
}

impl ApiRequest {
    /// Body for `prompt`, falling back to `default_max_tokens`.
    #[must_use]
    pub fn from_prompt(model: &str, default_max_tokens: u32, prompt: &Prompt) -> Self {
        Self {
            model: model.to_string(),
            max_tokens: prompt.max_tokens.unwrap_or(default_max_tokens),
            system: prompt.system.clone(),
            temperature: prompt.temperature,
            messages: vec![ApiMessage {
                role: Role::User,
                content: prompt.user.clone(),
            }],
        }
    }
}

/// Successful response body.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    /// Content blocks, in order.
    pub content: Vec<ContentBlock>,
    /// Model that answered.
    #[serde(default)]
    pub model: String,
    /// Billed tokens.
    pub usage: ApiUsage,
    /// Why generation ended.
    #[serde(default)]
    pub stop_reason: Option<String>,
}

impl ApiResponse {
    /// Join the text blocks; `None` when no text came back.
    #[must_use]
    pub fn into_completion(self) -> Option<Completion> {
        let text = self
            .content
            .iter()
            .filter_map(ContentBlock::as_text)
            .collect::<Vec<_>>()
            .join("\n");
        if text.trim().is_empty() {
            return None;
        }
        let usage = Usage::new(self.usage.input_tokens, self.usage.output_tokens);
        let stop = StopReason::from_api(self.stop_reason.as_deref());
        Some(Completion::new(text, usage).with_stop(stop))
    }
}

/// Content block of a response. Only text carries generator output.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    /// Text output.
    Text {
        /// The text.
        text: String,
    },
    /// Thinking, tool use and any future block type.
    #[serde(other)]
    Other,
}

impl ContentBlock {
    /// The text of a text block.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text } => Some(text),
            Self::Other => None,
        }
    }
}

/// Token counts as reported by the API.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
pub struct ApiUsage {
    /// Prompt tokens.
    pub input_tokens: u32,
    /// Generated tokens.
    pub output_tokens: u32,
}

/// Body of a non-2xx response: `{"type": "error", "error": {...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    /// Details.
    pub error: ApiErrorDetails,
}

/// Inner error object.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetails {
    /// Category, e.g. `invalid_request_error`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Human-readable message.
    pub message: String,
}
