//! MCP server implementation.
//!
//! This module provides:
//! - Tool definitions with rmcp macros
//! - Tool parameter types with published JSON schemas
//! - Shared state (generator, sequential-thinking sessions, configuration)
//! - The stdio transport
//!
//! # Architecture
//!
//! Five tools are exposed:
//!
//! - **Generated**: `brain_think`, `brain_analyze`, `brain_solve`, `brain_reflect`
//! - **Caller-driven**: `sequential_thinking`
//!
//! # Example
//!
//! ```no_run
//! use mcp_brain::config::Config;
//! use mcp_brain::server::McpServer;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::with_api_key("sk-ant-xxx");
//! McpServer::new(config).run_stdio().await?;
//! # Ok(())
//! # }
//! ```

mod mcp;
mod params;
mod tools;
mod transport;
mod types;

pub use mcp::McpServer;
pub use params::{AnalyzeParams, ReflectParams, SolveParams, ThinkParams};
pub use tools::BrainServer;
pub use transport::StdioTransport;
pub use types::AppState;
