//! Prompt and completion types exchanged with the model client.
//!
//! Every generator call is a single turn: a system prompt describing the
//! expected JSON shape and one user prompt carrying the problem and the
//! prior thoughts. [`Prompt`] models exactly that.

/// One generator request.
#[derive(Debug, Clone, PartialEq)]
#[allow(clippy::derive_partial_eq_without_eq)]
pub struct Prompt {
    /// Instructions for the model.
    pub system: Option<String>,
    /// The user turn.
    pub user: String,
    /// Output token limit; the client default applies when unset.
    pub max_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

impl Prompt {
    /// A prompt with only a user turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            system: None,
            user: text.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Set the system prompt.
    #[must_use]
    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    /// Set the output token limit.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Bytes of prompt text sent to the model.
    #[must_use]
    pub fn text_len(&self) -> usize {
        self.user.len() + self.system.as_ref().map_or(0, String::len)
    }
}

/// Tokens billed for a call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Usage {
    /// Prompt tokens.
    pub input_tokens: u32,
    /// Generated tokens.
    pub output_tokens: u32,
}

impl Usage {
    /// Usage from the two token counts.
    #[must_use]
    pub const fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    /// Input plus output, saturating.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Why the model stopped writing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StopReason {
    /// The model finished its answer.
    #[default]
    EndTurn,
    /// The output hit the token limit; JSON replies are likely cut off.
    MaxTokens,
    /// Anything else the API reports.
    Other,
}

impl StopReason {
    /// Map the API's `stop_reason` string.
    #[must_use]
    pub fn from_api(value: Option<&str>) -> Self {
        match value {
            None | Some("end_turn" | "stop_sequence") => Self::EndTurn,
            Some("max_tokens") => Self::MaxTokens,
            Some(_) => Self::Other,
        }
    }
}

/// Text produced by the model for one [`Prompt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Joined text blocks.
    pub text: String,
    /// Tokens billed.
    pub usage: Usage,
    /// Why generation ended.
    pub stop: StopReason,
}

impl Completion {
    /// A completion that ended normally.
    #[must_use]
    pub fn new(text: impl Into<String>, usage: Usage) -> Self {
        Self {
            text: text.into(),
            usage,
            stop: StopReason::EndTurn,
        }
    }

    /// Set the stop reason.
    #[must_use]
    pub const fn with_stop(mut self, stop: StopReason) -> Self {
        self.stop = stop;
        self
    }

    /// Whether the reply was cut off by the token limit.
    #[must_use]
    pub fn is_truncated(&self) -> bool {
        self.stop == StopReason::MaxTokens
    }
}
