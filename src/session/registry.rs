//! Registry of long-lived sessions for caller-driven thinking.
//!
//! The registry never schedules anything itself; the host calls
//! [`SessionRegistry::sweep_expired`] from whatever timer it owns.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::manager::SessionManager;
use super::types::{ProcessingOptions, ReasoningContext, ThinkingStyle};
use crate::error::SessionError;
use crate::traits::{RealTimeProvider, TimeProvider};

struct Entry {
    manager: SessionManager,
    last_access: DateTime<Utc>,
}

/// Sessions keyed by id, with last-access tracking.
pub struct SessionRegistry {
    sessions: HashMap<String, Entry>,
    clock: Arc<dyn TimeProvider>,
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.sessions.len())
            .finish_non_exhaustive()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    /// Registry on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(RealTimeProvider))
    }

    /// Registry on an injected clock.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn TimeProvider>) -> Self {
        Self {
            sessions: HashMap::new(),
            clock,
        }
    }

    /// Create and register a session. A given `id` replaces the generated one.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidOption`] if `options` fail validation.
    pub fn create(
        &mut self,
        id: Option<String>,
        problem: impl Into<String>,
        style: ThinkingStyle,
        context: ReasoningContext,
        options: ProcessingOptions,
    ) -> Result<&mut SessionManager, SessionError> {
        let mut manager = SessionManager::create_with_clock(
            problem,
            style,
            context,
            options,
            Arc::clone(&self.clock),
        )?;
        if let Some(id) = id {
            manager = manager.with_session_id(id);
        }
        let id = manager.id().to_string();
        let entry = Entry {
            manager,
            last_access: self.clock.now(),
        };
        tracing::info!(session_id = %id, "Registered session");
        let slot = self.sessions.entry(id).insert_entry(entry);
        Ok(&mut slot.into_mut().manager)
    }

    /// Look up a session without touching its access time.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SessionManager> {
        self.sessions.get(id).map(|e| &e.manager)
    }

    /// Look up a session for mutation and refresh its access time.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut SessionManager> {
        let now = self.clock.now();
        self.sessions.get_mut(id).map(|e| {
            e.last_access = now;
            &mut e.manager
        })
    }

    /// Look up a session for mutation or fail.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::SessionNotFound`] for unknown ids.
    pub fn require_mut(&mut self, id: &str) -> Result<&mut SessionManager, SessionError> {
        self.get_mut(id).ok_or_else(|| SessionError::SessionNotFound {
            session_id: id.to_string(),
        })
    }

    /// Drop a session, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<SessionManager> {
        self.sessions.remove(id).map(|e| e.manager)
    }

    /// Number of registered sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Current time on the registry clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Remove sessions idle for longer than `max_age` as of `now`.
    ///
    /// Returns the number removed.
    pub fn sweep_expired(&mut self, now: DateTime<Utc>, max_age: chrono::Duration) -> usize {
        let before = self.sessions.len();
        self.sessions
            .retain(|_, entry| now.signed_duration_since(entry.last_access) <= max_age);
        let removed = before - self.sessions.len();
        if removed > 0 {
            tracing::info!(removed, remaining = self.sessions.len(), "Swept expired sessions");
        }
        removed
    }
}
