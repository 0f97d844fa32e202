//! Shared server state.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::generator::Generator;
use crate::modes::ControlLoop;
use crate::session::SessionRegistry;

/// Shared application state for all tool handlers.
#[derive(Clone)]
pub struct AppState {
    /// Content generator used by every generated mode.
    pub generator: Arc<dyn Generator>,
    /// Sessions of the sequential-thinking tool.
    pub sessions: Arc<Mutex<SessionRegistry>>,
    /// Server configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates a new application state with an empty session registry.
    #[must_use]
    pub fn new(generator: Arc<dyn Generator>, config: Config) -> Self {
        Self {
            generator,
            sessions: Arc::new(Mutex::new(SessionRegistry::new())),
            config: Arc::new(config),
        }
    }

    /// Control loop over the shared generator, paced per configuration.
    #[must_use]
    pub fn control_loop(&self) -> ControlLoop {
        ControlLoop::new(Arc::clone(&self.generator)).with_pacing_delay(self.config.pacing_delay())
    }

    /// Drop sequential sessions idle for longer than the configured age.
    pub async fn sweep_sessions(&self) -> usize {
        let max_age = chrono::Duration::from_std(self.config.session_max_age())
            .unwrap_or(chrono::Duration::MAX);
        let mut sessions = self.sessions.lock().await;
        let now = sessions.now();
        sessions.sweep_expired(now, max_age)
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
