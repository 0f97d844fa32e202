//! Tool definitions with rmcp macros.
//!
//! `#[tool_router]` collects the `#[tool]` methods into a router and
//! `#[tool_handler]` wires that router into [`ServerHandler`]. Every tool
//! returns its result record as JSON text content.

use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{CallToolResult, Content, ServerCapabilities, ServerInfo};
use rmcp::{tool, tool_handler, tool_router, ErrorData, ServerHandler};
use serde::Serialize;
use tracing::{info, warn};

use super::params::{AnalyzeParams, ReflectParams, SolveParams, ThinkParams};
use super::types::AppState;
use crate::error::{McpError, ModeError};
use crate::modes::{record_thought, ProcessingMode, ReasoningRequest, SequentialThought};

const INSTRUCTIONS: &str = "Structured reasoning tools. brain_think reasons open-endedly with \
revision, brain_analyze walks named analytical steps, brain_solve iterates tested solution \
candidates, brain_reflect reviews a text for issues, and sequential_thinking records \
caller-written thoughts in a persistent session.";

/// MCP server exposing the brain tools.
#[derive(Clone)]
pub struct BrainServer {
    state: Arc<AppState>,
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for BrainServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrainServer")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

#[tool_router]
impl BrainServer {
    /// Creates a server over shared state.
    #[must_use]
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        name = "brain_think",
        description = "Reason about a problem step by step. Generates thoughts, revises weak ones, \
                       optionally tests a hypothesis, and synthesizes a final answer."
    )]
    async fn brain_think(
        &self,
        Parameters(params): Parameters<ThinkParams>,
    ) -> Result<CallToolResult, ErrorData> {
        self.run_mode("brain_think", ProcessingMode::Think, params.into_request())
            .await
    }

    #[tool(
        name = "brain_analyze",
        description = "Analyze a subject through named steps (basic, detailed or comprehensive), \
                       optionally exploring contrarian, optimistic, pessimistic and outsider stances."
    )]
    async fn brain_analyze(
        &self,
        Parameters(params): Parameters<AnalyzeParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let mode = params.mode();
        self.run_mode("brain_analyze", mode, params.into_request())
            .await
    }

    #[tool(
        name = "brain_solve",
        description = "Solve a problem iteratively. Each candidate solution is checked with a \
                       tested hypothesis; stops early on a confident, confirmed candidate."
    )]
    async fn brain_solve(
        &self,
        Parameters(params): Parameters<SolveParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let mode = params.mode();
        self.run_mode("brain_solve", mode, params.into_request())
            .await
    }

    #[tool(
        name = "brain_reflect",
        description = "Review a text through focus areas, list issues by severity, suggest \
                       improvements and optionally produce an improved version."
    )]
    async fn brain_reflect(
        &self,
        Parameters(params): Parameters<ReflectParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let mode = params.mode();
        self.run_mode("brain_reflect", mode, params.into_request())
            .await
    }

    #[tool(
        name = "sequential_thinking",
        description = "Record one caller-written thought. Supports revisions and branches; pass \
                       the returned sessionId on the next call to continue the session."
    )]
    async fn sequential_thinking(
        &self,
        Parameters(params): Parameters<SequentialThought>,
    ) -> Result<CallToolResult, ErrorData> {
        let status = {
            let mut sessions = self.state.sessions.lock().await;
            record_thought(&mut sessions, params)
                .map_err(|e| mode_error_data("sequential_thinking", &e))?
        };
        json_result(&status)
    }
}

impl BrainServer {
    async fn run_mode(
        &self,
        tool: &'static str,
        mode: ProcessingMode,
        request: ReasoningRequest,
    ) -> Result<CallToolResult, ErrorData> {
        if request.problem.trim().is_empty() {
            return Err(mode_error_data(
                tool,
                &ModeError::MissingField {
                    field: "problem".to_string(),
                },
            ));
        }
        info!(tool, mode = mode.as_str(), "Tool invoked");
        let result = self
            .state
            .control_loop()
            .run(request, &mode)
            .await
            .map_err(|e| mode_error_data(tool, &e))?;
        json_result(&result)
    }
}

#[tool_handler]
impl ServerHandler for BrainServer {
    fn get_info(&self) -> ServerInfo {
        let mut info = ServerInfo::default();
        info.capabilities = ServerCapabilities::builder().enable_tools().build();
        info.server_info.name = env!("CARGO_PKG_NAME").to_string();
        info.server_info.version = env!("CARGO_PKG_VERSION").to_string();
        info.instructions = Some(INSTRUCTIONS.to_string());
        info
    }
}

/// Map a mode failure onto the MCP error space.
///
/// Caller mistakes and session contract violations are `invalid_params`;
/// everything else is `internal_error`.
fn mode_error_data(tool: &str, error: &ModeError) -> ErrorData {
    if error.is_caller_error() {
        let err = McpError::InvalidParameters {
            tool: tool.to_string(),
            message: error.to_string(),
        };
        warn!(tool, error = %err, "Rejected tool call");
        ErrorData::invalid_params(err.to_string(), None)
    } else {
        let err = McpError::Internal {
            message: error.to_string(),
        };
        warn!(tool, error = %err, "Tool call failed");
        ErrorData::internal_error(err.to_string(), None)
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, ErrorData> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| ErrorData::internal_error(format!("Failed to serialize result: {e}"), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}
