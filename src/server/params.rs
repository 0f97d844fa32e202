//! Tool parameter types.
//!
//! Input structures for the five brain tools. Each derives `JsonSchema` so
//! rmcp can publish the tool's input schema.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::modes::{AnalysisDepth, ProcessingMode, ReasoningRequest, DEFAULT_MAX_ITERATIONS};
use crate::session::{ProcessingOptions, ReasoningContext, ThinkingStyle};

/// Parameters for `brain_think`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ThinkParams {
    /// Problem to reason about.
    #[schemars(description = "Problem or question to reason about")]
    pub problem: String,

    /// Reasoning style.
    #[schemars(
        description = "analytical, systematic, creative, critical, strategic, intuitive, scientific or philosophical"
    )]
    #[serde(default)]
    pub thinking_style: ThinkingStyle,

    /// Background for the problem.
    #[serde(default)]
    pub context: ReasoningContext,

    /// Processing options.
    #[serde(default)]
    pub options: ProcessingOptions,
}

impl ThinkParams {
    /// Convert into a control-loop request.
    #[must_use]
    pub fn into_request(self) -> ReasoningRequest {
        ReasoningRequest::new(self.problem)
            .with_style(self.thinking_style)
            .with_context(self.context)
            .with_options(self.options)
    }
}

/// Parameters for `brain_analyze`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeParams {
    /// Subject of the analysis.
    #[schemars(description = "Subject to analyze")]
    pub subject: String,

    /// Step set.
    #[schemars(description = "basic, detailed or comprehensive")]
    #[serde(default)]
    pub analysis_depth: AnalysisDepth,

    /// Explore contrarian, optimistic, pessimistic and outsider stances.
    #[serde(default)]
    pub explore_branches: bool,

    /// Reasoning style.
    #[serde(default)]
    pub thinking_style: ThinkingStyle,

    /// Background for the subject.
    #[serde(default)]
    pub context: ReasoningContext,

    /// Processing options.
    #[serde(default)]
    pub options: ProcessingOptions,
}

impl AnalyzeParams {
    /// Mode selected by these parameters.
    #[must_use]
    pub const fn mode(&self) -> ProcessingMode {
        ProcessingMode::Analyze {
            depth: self.analysis_depth,
            explore_branches: self.explore_branches,
        }
    }

    /// Convert into a control-loop request.
    #[must_use]
    pub fn into_request(self) -> ReasoningRequest {
        ReasoningRequest::new(self.subject)
            .with_style(self.thinking_style)
            .with_context(self.context)
            .with_options(self.options)
    }
}

const fn default_max_iterations() -> u32 {
    DEFAULT_MAX_ITERATIONS
}

/// Parameters for `brain_solve`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SolveParams {
    /// Problem to solve.
    #[schemars(description = "Problem statement to solve")]
    pub problem_statement: String,

    /// Candidate budget.
    #[schemars(range(min = 1, max = 10))]
    #[schemars(description = "Maximum solution candidates (1-10)")]
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Reasoning style.
    #[serde(default)]
    pub thinking_style: ThinkingStyle,

    /// Background for the problem.
    #[serde(default)]
    pub context: ReasoningContext,

    /// Processing options.
    #[serde(default)]
    pub options: ProcessingOptions,
}

impl SolveParams {
    /// Mode selected by these parameters.
    #[must_use]
    pub const fn mode(&self) -> ProcessingMode {
        ProcessingMode::Solve {
            max_iterations: self.max_iterations,
        }
    }

    /// Convert into a control-loop request.
    #[must_use]
    pub fn into_request(self) -> ReasoningRequest {
        ReasoningRequest::new(self.problem_statement)
            .with_style(self.thinking_style)
            .with_context(self.context)
            .with_options(self.options)
    }
}

/// Parameters for `brain_reflect`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReflectParams {
    /// Text to reflect on.
    #[schemars(description = "Text to review")]
    pub subject: String,

    /// Lenses to review through.
    #[schemars(description = "Focus areas; defaults to logic, completeness, clarity, assumptions")]
    #[serde(default)]
    pub focus_areas: Vec<String>,

    /// Produce a rewritten text.
    #[serde(default)]
    pub generate_improved_version: bool,

    /// Reasoning style.
    #[serde(default = "critical_style")]
    pub thinking_style: ThinkingStyle,

    /// Processing options.
    #[serde(default)]
    pub options: ProcessingOptions,
}

const fn critical_style() -> ThinkingStyle {
    ThinkingStyle::Critical
}

impl ReflectParams {
    /// Mode selected by these parameters.
    #[must_use]
    pub fn mode(&self) -> ProcessingMode {
        ProcessingMode::Reflect {
            focus_areas: self.focus_areas.clone(),
            generate_improved_version: self.generate_improved_version,
        }
    }

    /// Convert into a control-loop request.
    #[must_use]
    pub fn into_request(self) -> ReasoningRequest {
        ReasoningRequest::new(self.subject)
            .with_style(self.thinking_style)
            .with_options(self.options)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::session::OutputDetail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_think_params_defaults() {
        let params: ThinkParams = serde_json::from_str(r#"{"problem": "p"}"#).unwrap();
        assert_eq!(params.thinking_style, ThinkingStyle::Analytical);
        assert_eq!(params.options, ProcessingOptions::default());
        let request = params.into_request();
        assert_eq!(request.problem, "p");
    }

    #[test]
    fn test_think_params_camel_case_options() {
        let json = r#"{
            "problem": "p",
            "thinkingStyle": "scientific",
            "context": {"domain": "healthcare", "constraints": ["HIPAA"]},
            "options": {"maxThoughts": 4, "timeLimit": 30, "outputDetail": "summary"}
        }"#;
        let params: ThinkParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.thinking_style, ThinkingStyle::Scientific);
        assert_eq!(params.context.domain.as_deref(), Some("healthcare"));
        assert_eq!(params.options.max_thoughts, 4);
        assert_eq!(params.options.time_limit_secs, 30);
        assert_eq!(params.options.output_detail, OutputDetail::Summary);
        assert!(params.options.allow_revision);
    }

    #[test]
    fn test_analyze_params_mode() {
        let params: AnalyzeParams = serde_json::from_str(
            r#"{"subject": "s", "analysisDepth": "comprehensive", "exploreBranches": true}"#,
        )
        .unwrap();
        assert_eq!(
            params.mode(),
            ProcessingMode::Analyze {
                depth: AnalysisDepth::Comprehensive,
                explore_branches: true
            }
        );
    }

    #[test]
    fn test_solve_params_default_iterations() {
        let params: SolveParams = serde_json::from_str(r#"{"problemStatement": "x"}"#).unwrap();
        assert_eq!(params.max_iterations, DEFAULT_MAX_ITERATIONS);
    }

    #[test]
    fn test_reflect_params_default_style() {
        let params: ReflectParams = serde_json::from_str(r#"{"subject": "x"}"#).unwrap();
        assert_eq!(params.thinking_style, ThinkingStyle::Critical);
        assert!(params.focus_areas.is_empty());
        assert!(!params.generate_improved_version);
    }

    #[test]
    fn test_params_have_schemas() {
        let schema = serde_json::to_value(schemars::schema_for!(ThinkParams)).unwrap();
        assert!(schema["properties"].get("problem").is_some());
        let _ = schemars::schema_for!(AnalyzeParams);
        let _ = schemars::schema_for!(SolveParams);
        let _ = schemars::schema_for!(ReflectParams);
    }
}
