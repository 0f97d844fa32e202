//! Generator backed by the Anthropic Messages API.

use async_trait::async_trait;
use serde_json::Value;

use super::json::{extract_json, field_confidence, field_str, field_string_list};
use super::{
    GeneratedHypothesis, GeneratedThought, Generator, HypothesisVerdict, Issue, Severity,
    Synthesis,
};
use crate::error::ModeError;
use crate::prompts;
use crate::session::{
    Hypothesis, HypothesisResult, ReasoningContext, ThinkingStyle, Thought,
    DEFAULT_THOUGHT_CONFIDENCE,
};
use crate::traits::{AnthropicClientTrait, Prompt};

const DEFAULT_MAX_TOKENS: u32 = 2048;
const SYNTHESIS_MAX_TOKENS: u32 = 4096;
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// [`Generator`] that prompts a model and parses its JSON replies.
pub struct LlmGenerator<C: AnthropicClientTrait> {
    client: C,
    max_tokens: u32,
    temperature: f32,
}

impl<C: AnthropicClientTrait> std::fmt::Debug for LlmGenerator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmGenerator")
            .field("client", &"<AnthropicClient>")
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl<C: AnthropicClientTrait> LlmGenerator<C> {
    /// Create a generator over `client`.
    #[must_use]
    pub const fn new(client: C) -> Self {
        Self {
            client,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set the per-call token limit.
    #[must_use]
    pub const fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    async fn ask(&self, system: &str, user: String, max_tokens: u32) -> Result<String, ModeError> {
        let prompt = Prompt::user(user)
            .with_system(system)
            .with_max_tokens(max_tokens)
            .with_temperature(self.temperature);
        let completion = self.client.complete(prompt).await?;
        if completion.is_truncated() {
            tracing::warn!(max_tokens, "Generator reply hit the token limit");
        }
        tracing::debug!(
            input_tokens = completion.usage.input_tokens,
            output_tokens = completion.usage.output_tokens,
            "Generator call completed"
        );
        Ok(completion.text)
    }

    async fn ask_json(&self, system: &str, user: String) -> Result<Value, ModeError> {
        let text = self.ask(system, user, self.max_tokens).await?;
        extract_json(&text)
    }

    /// Text answers may come back as JSON with `field` or as plain prose.
    async fn ask_text(&self, system: &str, user: String, field: &str) -> Result<String, ModeError> {
        let text = self.ask(system, user, self.max_tokens).await?;
        match extract_json(&text) {
            Ok(value) => field_str(&value, field),
            Err(_) if !text.trim().is_empty() => Ok(text.trim().to_string()),
            Err(e) => Err(e),
        }
    }
}

fn parse_issue(value: &Value) -> Result<Issue, ModeError> {
    let description = field_str(value, "description")?;
    let severity = field_str(value, "severity")?
        .parse::<Severity>()
        .map_err(|reason| ModeError::InvalidValue {
            field: "severity".to_string(),
            reason,
        })?;
    let suggestion = field_str(value, "suggestion").ok();
    Ok(Issue {
        description,
        severity,
        suggestion,
    })
}

#[async_trait]
impl<C: AnthropicClientTrait> Generator for LlmGenerator<C> {
    async fn generate_thought(
        &self,
        problem: &str,
        prior: &[Thought],
        style: ThinkingStyle,
        target_sequence: u32,
        context: &ReasoningContext,
        focus: Option<String>,
    ) -> Result<GeneratedThought, ModeError> {
        let user = prompts::thought_message(
            problem,
            prior,
            style,
            target_sequence,
            context,
            focus.as_deref(),
        );
        let value = self.ask_json(prompts::thought_system_prompt(), user).await?;
        Ok(GeneratedThought {
            content: field_str(&value, "content")?,
            confidence: field_confidence(&value, "confidence", DEFAULT_THOUGHT_CONFIDENCE),
        })
    }

    async fn generate_revision(
        &self,
        original: &Thought,
        all: &[Thought],
        problem: &str,
    ) -> Result<String, ModeError> {
        let user = prompts::revision_message(original, all, problem);
        self.ask_text(prompts::revision_system_prompt(), user, "content")
            .await
    }

    async fn generate_hypothesis(
        &self,
        problem: &str,
        prior: &[Thought],
        style: ThinkingStyle,
    ) -> Result<GeneratedHypothesis, ModeError> {
        let user = prompts::hypothesis_message(problem, prior, style);
        let value = self
            .ask_json(prompts::hypothesis_system_prompt(), user)
            .await?;
        Ok(GeneratedHypothesis {
            statement: field_str(&value, "statement")?,
            evidence: field_string_list(&value, "evidence"),
            confidence: field_confidence(&value, "confidence", 0.5),
        })
    }

    async fn test_hypothesis(
        &self,
        hypothesis: &Hypothesis,
        prior: &[Thought],
        extra_context: Option<String>,
    ) -> Result<HypothesisVerdict, ModeError> {
        let user = prompts::hypothesis_test_message(hypothesis, prior, extra_context.as_deref());
        let value = self
            .ask_json(prompts::hypothesis_test_system_prompt(), user)
            .await?;
        let result = field_str(&value, "result")?
            .parse::<HypothesisResult>()
            .map_err(|reason| ModeError::InvalidValue {
                field: "result".to_string(),
                reason,
            })?;
        Ok(HypothesisVerdict {
            result,
            evidence: field_string_list(&value, "evidence"),
            reasoning: field_str(&value, "reasoning").unwrap_or_default(),
        })
    }

    async fn synthesize(
        &self,
        problem: &str,
        thoughts: &[Thought],
        hypotheses: &[Hypothesis],
        style: ThinkingStyle,
        context: &ReasoningContext,
    ) -> Result<Synthesis, ModeError> {
        let user = prompts::synthesis_message(problem, thoughts, hypotheses, style, context);
        let text = self
            .ask(prompts::synthesis_system_prompt(), user, SYNTHESIS_MAX_TOKENS)
            .await?;
        let value = extract_json(&text)?;
        Ok(Synthesis {
            analysis: field_str(&value, "analysis")?,
            confidence: field_confidence(&value, "confidence", DEFAULT_THOUGHT_CONFIDENCE),
            recommendations: field_string_list(&value, "recommendations"),
            next_steps: field_string_list(&value, "next_steps"),
        })
    }

    async fn reflect(
        &self,
        subject: &str,
        focus: &str,
        style: ThinkingStyle,
    ) -> Result<GeneratedThought, ModeError> {
        let user = prompts::reflection_message(subject, focus, style);
        let value = self
            .ask_json(prompts::reflection_system_prompt(), user)
            .await?;
        Ok(GeneratedThought {
            content: field_str(&value, "content")?,
            confidence: field_confidence(&value, "confidence", DEFAULT_THOUGHT_CONFIDENCE),
        })
    }

    async fn identify_issues(
        &self,
        subject: &str,
        reflection: &str,
        focus: &str,
    ) -> Result<Vec<Issue>, ModeError> {
        let user = prompts::issues_message(subject, reflection, focus);
        let value = self.ask_json(prompts::issues_system_prompt(), user).await?;
        let items = value
            .get("issues")
            .and_then(Value::as_array)
            .or_else(|| value.as_array())
            .ok_or_else(|| ModeError::MissingField {
                field: "issues".to_string(),
            })?;
        items.iter().map(parse_issue).collect()
    }

    async fn improve_text(&self, subject: &str, issues: &[Issue]) -> Result<String, ModeError> {
        let user = prompts::improvement_message(subject, issues);
        self.ask_text(prompts::improvement_system_prompt(), user, "improved")
            .await
    }
}
