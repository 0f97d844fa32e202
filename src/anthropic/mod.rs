//! Anthropic Messages API client.
//!
//! [`AnthropicClient`] implements
//! [`AnthropicClientTrait`](crate::traits::AnthropicClientTrait): one
//! [`Prompt`](crate::traits::Prompt) in, one
//! [`Completion`](crate::traits::Completion) out. Rate limits, overloads and
//! network failures are retried per [`RetryPolicy`].

mod client;
mod config;
mod types;

pub use client::{AnthropicClient, MAX_PROMPT_BYTES};
pub use config::{ClientConfig, RetryPolicy, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS};
pub use types::{
    ApiErrorBody, ApiErrorDetails, ApiMessage, ApiRequest, ApiResponse, ApiUsage, ContentBlock,
    Role,
};
