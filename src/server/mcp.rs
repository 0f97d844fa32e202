//! Main MCP server orchestration.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::anthropic::{AnthropicClient, ClientConfig};
use crate::config::Config;
use crate::error::AppError;
use crate::generator::LlmGenerator;

use super::tools::BrainServer;
use super::transport::StdioTransport;
use super::types::AppState;

/// Main MCP server that wires configuration, generator and transport.
#[derive(Debug)]
pub struct McpServer {
    config: Config,
}

impl McpServer {
    /// Creates a new MCP server with the given configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Build the shared state: an Anthropic-backed generator and an empty
    /// session registry.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn build_state(&self) -> Result<AppState, AppError> {
        let client_config = ClientConfig::default()
            .with_model(&self.config.model)
            .with_timeout(Duration::from_millis(self.config.request_timeout_ms))
            .with_max_retries(self.config.max_retries);
        let client = AnthropicClient::new(self.config.api_key.expose(), client_config)?;
        let generator = LlmGenerator::new(client);
        Ok(AppState::new(Arc::new(generator), self.config.clone()))
    }

    /// Runs the server using stdio transport.
    ///
    /// Blocks until the client disconnects. A background task sweeps idle
    /// sequential-thinking sessions for the lifetime of the server.
    ///
    /// # Errors
    ///
    /// Returns an error if client creation or the MCP handshake fails.
    #[cfg_attr(coverage_nightly, coverage(off))]
    pub async fn run_stdio(&self) -> Result<(), AppError> {
        let state = Arc::new(self.build_state()?);
        let sweeper = spawn_sweeper(Arc::clone(&state));

        info!(model = %self.config.model, "Serving brain tools over stdio");
        let server = BrainServer::new(state);
        let running = StdioTransport::new().serve(server).await?;
        let cancel = running.cancellation_token();
        tokio::select! {
            reason = running.waiting() => debug!(?reason, "Client disconnected"),
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, shutting down");
                cancel.cancel();
            }
        }

        sweeper.abort();
        Ok(())
    }

    /// Returns the server configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }
}

fn spawn_sweeper(state: Arc<AppState>) -> tokio::task::JoinHandle<()> {
    let period = state.config.session_sweep_interval();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = state.sweep_sessions().await;
            debug!(removed, "Session sweep finished");
        }
    })
}
