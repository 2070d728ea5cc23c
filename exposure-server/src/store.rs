//! In-memory session store
//!
//! One `ScanSession` per id, bounded by `MAX_SESSIONS`. The lock is never
//! held across an await point.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use callbreach_core::{ExposurePolicy, ScanSession};

use crate::error::{AppError, AppResult};

pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, ScanSession>>,
    max_sessions: usize,
}

impl SessionStore {
    pub fn new(max_sessions: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
        }
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    /// Create a session; fails with 503 once the cap is reached
    pub fn create(&self, policy: ExposurePolicy) -> AppResult<Uuid> {
        // request-derived policy: every failure is a 400
        let session = ScanSession::new(policy).map_err(|e| AppError::ValidationError(e.to_string()))?;
        let id = session.id();

        let mut sessions = self.sessions.write();
        if sessions.len() >= self.max_sessions {
            return Err(AppError::ServiceUnavailable(format!(
                "Session limit of {} reached",
                self.max_sessions
            )));
        }
        sessions.insert(id, session);
        Ok(id)
    }

    /// Run `f` against one session under the write lock
    pub fn with_session<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut ScanSession) -> AppResult<R>,
    ) -> AppResult<R> {
        let mut sessions = self.sessions.write();
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound("Scan not found".to_string()))?;
        f(session)
    }

    /// Read-only access
    pub fn read_session<R>(&self, id: Uuid, f: impl FnOnce(&ScanSession) -> R) -> AppResult<R> {
        let sessions = self.sessions.read();
        sessions
            .get(&id)
            .map(f)
            .ok_or_else(|| AppError::NotFound("Scan not found".to_string()))
    }

    /// Drop sessions created more than `ttl` ago; returns how many went
    pub fn purge_older_than(&self, ttl: Duration) -> usize {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500));
        let cutoff = Utc::now() - ttl;

        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.created_at() > cutoff);
        before - sessions.len()
    }
}
