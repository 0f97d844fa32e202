//! HTTP client for the Messages endpoint.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};

use super::config::ClientConfig;
use super::types::{ApiErrorBody, ApiRequest, ApiResponse};
use crate::config::SecretString;
use crate::error::{AnthropicError, ModeError};
use crate::traits::{AnthropicClientTrait, Completion, Prompt};

/// Largest prompt (system plus user text, in bytes) the client will send.
pub const MAX_PROMPT_BYTES: usize = 100_000;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Seconds to wait on a 429 that carries no `retry-after` header.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Calls the Messages API and retries transient failures.
#[derive(Debug)]
pub struct AnthropicClient {
    http: Client,
    api_key: SecretString,
    config: ClientConfig,
}

impl AnthropicClient {
    /// Build a client.
    ///
    /// # Errors
    ///
    /// Returns [`AnthropicError::Network`] if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>, config: ClientConfig) -> Result<Self, AnthropicError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AnthropicError::Network {
                message: format!("Failed to create HTTP client: {e}"),
            })?;
        Ok(Self {
            http,
            api_key: SecretString::new(api_key),
            config,
        })
    }

    /// Settings in use.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Send `prompt`, retrying rate limits, overloads and network failures.
    ///
    /// # Errors
    ///
    /// Returns the last [`AnthropicError`] once retries are exhausted, or the
    /// first non-retryable one.
    pub async fn send(&self, prompt: &Prompt) -> Result<Completion, AnthropicError> {
        check_prompt(prompt)?;
        let body =
            ApiRequest::from_prompt(&self.config.model, self.config.default_max_tokens, prompt);

        let mut retry = 0;
        loop {
            match self.post(&body).await {
                Ok(completion) => return Ok(completion),
                Err(err) if err.is_retryable() && retry < self.config.retry.max_retries => {
                    retry += 1;
                    let wait = self.config.retry.wait_before(retry, &err);
                    tracing::warn!(
                        error = %err,
                        retry,
                        wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX),
                        "Retrying Anthropic request"
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn post(&self, body: &ApiRequest) -> Result<Completion, AnthropicError> {
        let url = format!("{}/messages", self.config.base_url);
        let started = Instant::now();
        tracing::debug!(
            model = %body.model,
            max_tokens = body.max_tokens,
            "Sending Anthropic request"
        );

        let response = self
            .http
            .post(&url)
            .header("x-api-key", self.api_key.expose())
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnthropicError::Timeout {
                        timeout_ms: u64::try_from(self.config.timeout.as_millis())
                            .unwrap_or(u64::MAX),
                    }
                } else {
                    AnthropicError::Network {
                        message: e.to_string(),
                    }
                }
            })?;

        let status = response.status();
        tracing::debug!(
            status = %status,
            elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            "Anthropic response received"
        );

        if !status.is_success() {
            let headers = response.headers().clone();
            let text = response.text().await.unwrap_or_default();
            return Err(status_error(status, &headers, &text, &body.model));
        }

        let parsed: ApiResponse =
            response
                .json()
                .await
                .map_err(|e| AnthropicError::UnexpectedResponse {
                    message: format!("Failed to parse response: {e}"),
                })?;
        parsed
            .into_completion()
            .ok_or_else(|| AnthropicError::UnexpectedResponse {
                message: "No text content in response".to_string(),
            })
    }
}

fn check_prompt(prompt: &Prompt) -> Result<(), AnthropicError> {
    if prompt.user.trim().is_empty() {
        return Err(AnthropicError::InvalidRequest {
            message: "Prompt has no user text".to_string(),
        });
    }
    let size = prompt.text_len();
    if size > MAX_PROMPT_BYTES {
        return Err(AnthropicError::InvalidRequest {
            message: format!("Prompt too large: {size} > {MAX_PROMPT_BYTES} bytes"),
        });
    }
    Ok(())
}

/// Map a non-2xx answer to an error.
fn status_error(
    status: StatusCode,
    headers: &HeaderMap,
    body: &str,
    model: &str,
) -> AnthropicError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map_or_else(|_| format!("Status {status}: {body}"), |b| b.error.message);
    match status.as_u16() {
        401 | 403 => AnthropicError::AuthenticationFailed,
        429 => AnthropicError::RateLimited {
            retry_after_seconds: headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        529 => AnthropicError::ModelOverloaded {
            model: model.to_string(),
        },
        400 | 404 | 413 | 422 => AnthropicError::InvalidRequest { message },
        500..=599 => AnthropicError::Network { message },
        _ => AnthropicError::UnexpectedResponse { message },
    }
}

#[async_trait]
impl AnthropicClientTrait for AnthropicClient {
    async fn complete(&self, prompt: Prompt) -> Result<Completion, ModeError> {
        self.send(&prompt)
            .await
            .map_err(|e| ModeError::ApiUnavailable {
                message: e.to_string(),
            })
    }
}
