//! MCP Brain Server binary entry point.
//!
//! This binary provides a stdio-based MCP server for structured reasoning.
//! All logs go to stderr; stdout is reserved for MCP JSON-RPC messages.
//!
//! Coverage is excluded because the main function cannot be unit tested
//! as it requires the full MCP protocol handshake over stdio.

// Enable the coverage attribute when running with nightly for llvm-cov exclusions
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use mcp_brain::config::{Config, LogFormat, DEFAULT_LOG_LEVEL};
use mcp_brain::server::McpServer;
use tracing_subscriber::filter::EnvFilter;

#[cfg_attr(coverage_nightly, coverage(off))]
fn init_logging() {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string());
    let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));
    let format: LogFormat = std::env::var("LOG_FORMAT")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_default();

    // Logs go to stderr only; stdout is the JSON-RPC channel.
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.init(),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    init_logging();
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "mcp-brain starting");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Configuration error");
            std::process::exit(1);
        }
    };

    tracing::info!(
        model = %config.model,
        api_key = %config.api_key.hint(),
        timeout_ms = config.request_timeout_ms,
        max_retries = config.max_retries,
        pacing_delay_ms = config.pacing_delay_ms,
        "Configuration loaded"
    );

    let server = McpServer::new(config);
    if let Err(e) = server.run_stdio().await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("mcp-brain shutdown complete");
}
