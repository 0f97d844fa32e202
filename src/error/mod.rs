//! Error types, one enum per layer.
//!
//! [`SessionError`] is the only structural failure: it aborts whatever
//! operation raised it. Every other [`ModeError`] comes from the generator,
//! and the control loop records it as a skipped step and moves on.
//! [`AppError`] gathers everything the binary can fail with.

use thiserror::Error;

/// Anything that stops the server from starting or serving.
#[derive(Debug, Error)]
pub enum AppError {
    /// The model client could not be built.
    #[error("Anthropic API error: {0}")]
    Anthropic(#[from] AnthropicError),

    /// A session contract was violated outside a tool call.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Transport or protocol failure.
    #[error("MCP protocol error: {0}")]
    Mcp(#[from] McpError),

    /// A reasoning run failed.
    #[error("Mode execution error: {0}")]
    Mode(#[from] ModeError),

    /// Environment is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Failures talking to the Messages API.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnthropicError {
    /// 401 or 403.
    #[error("Authentication failed: invalid API key")]
    AuthenticationFailed,

    /// 429.
    #[error("Rate limited: retry after {retry_after_seconds}s")]
    RateLimited {
        /// Wait requested by the API.
        retry_after_seconds: u64,
    },

    /// 529.
    #[error("Model overloaded: {model}")]
    ModelOverloaded {
        /// Requested model.
        model: String,
    },

    /// No answer within the HTTP timeout.
    #[error("Request timeout after {timeout_ms}ms")]
    Timeout {
        /// Configured timeout.
        timeout_ms: u64,
    },

    /// The request was refused locally or by the API.
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What was wrong.
        message: String,
    },

    /// Connection failure or 5xx.
    #[error("Network error: {message}")]
    Network {
        /// Transport detail.
        message: String,
    },

    /// A 2xx body that could not be used.
    #[error("Unexpected response: {message}")]
    UnexpectedResponse {
        /// What was unexpected.
        message: String,
    },
}

impl AnthropicError {
    /// Whether a later attempt may succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited { .. }
                | Self::ModelOverloaded { .. }
                | Self::Timeout { .. }
                | Self::Network { .. }
        )
    }
}

/// Violations of the session contract.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Revision target is missing, not earlier, or revisions are off.
    #[error("Invalid revision: {reason}")]
    InvalidRevision {
        /// Why the revision was refused.
        reason: String,
    },

    /// The session was opened with branching disabled.
    #[error("Branching is disabled for this session")]
    BranchingDisabled,

    /// Branch anchor out of range, or an unknown branch id.
    #[error("Invalid branch target: {reason}")]
    InvalidBranchTarget {
        /// Why the target was refused.
        reason: String,
    },

    /// Unknown hypothesis id.
    #[error("Hypothesis not found: {id}")]
    HypothesisNotFound {
        /// Requested id.
        id: String,
    },

    /// Unknown sequential-thinking session.
    #[error("Session not found: {session_id}")]
    SessionNotFound {
        /// Requested id.
        session_id: String,
    },

    /// Processing option outside its range.
    #[error("Invalid option {field}: {reason}")]
    InvalidOption {
        /// Option name as callers spell it.
        field: String,
        /// Accepted range.
        reason: String,
    },
}

/// Protocol-level failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum McpError {
    /// A tool call the caller must fix.
    #[error("Invalid parameters for {tool}: {message}")]
    InvalidParameters {
        /// Tool name.
        tool: String,
        /// What was wrong.
        message: String,
    },

    /// Server-side failure.
    #[error("Internal error: {message}")]
    Internal {
        /// Detail.
        message: String,
    },
}

/// Failures while running a reasoning mode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModeError {
    /// A required input or generator field is absent or blank.
    #[error("Missing required field: {field}")]
    MissingField {
        /// Field name.
        field: String,
    },

    /// A field is present but unusable.
    #[error("Invalid value for {field}: {reason}")]
    InvalidValue {
        /// Field name.
        field: String,
        /// Why it was refused.
        reason: String,
    },

    /// The generator reply held no usable JSON.
    #[error("JSON parsing failed: {message}")]
    JsonParseFailed {
        /// Parser detail with a preview of the reply.
        message: String,
    },

    /// The model could not be reached.
    #[error("API unavailable: {message}")]
    ApiUnavailable {
        /// Client error text.
        message: String,
    },

    /// Session contract violation.
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ModeError {
    /// Structural errors abort the run instead of being skipped.
    #[must_use]
    pub const fn is_structural(&self) -> bool {
        matches!(self, Self::Session(_))
    }

    /// Whether the caller's input caused the failure.
    #[must_use]
    pub const fn is_caller_error(&self) -> bool {
        matches!(
            self,
            Self::Session(_) | Self::MissingField { .. } | Self::InvalidValue { .. }
        )
    }
}

/// Environment configuration failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset.
    #[error("Missing required: {var}")]
    MissingRequired {
        /// Variable name.
        var: String,
    },

    /// A variable does not parse or is out of range.
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue {
        /// Variable name.
        var: String,
        /// Why it was refused.
        reason: String,
    },
}
