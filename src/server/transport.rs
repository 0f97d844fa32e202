//! Stdio transport.
//!
//! stdout carries JSON-RPC frames only; all logging goes to stderr.

use rmcp::service::{serve_server, RoleServer, RunningService};
use rmcp::transport::io::stdio;

use super::tools::BrainServer;
use crate::error::{AppError, McpError};

/// Stdio transport handler.
#[derive(Debug, Default)]
pub struct StdioTransport;

impl StdioTransport {
    /// Creates a new stdio transport.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Start serving `server` over stdin/stdout.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Mcp`] if the MCP handshake fails.
    pub async fn serve(
        self,
        server: BrainServer,
    ) -> Result<RunningService<RoleServer, BrainServer>, AppError> {
        let (stdin, stdout) = stdio();

        serve_server(server, (stdin, stdout))
            .await
            .map_err(|e| {
                AppError::Mcp(McpError::Internal {
                    message: e.to_string(),
                })
            })
    }
}
