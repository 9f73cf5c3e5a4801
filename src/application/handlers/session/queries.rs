//! Read-side handlers: fetch one session, list with a status filter.
//!
//! Plain repository reads; the aggregate already carries the denormalized
//! shape listings need.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, SessionStatus};
use crate::domain::scheduling::{SchedulingError, Session};
use crate::ports::SessionRepository;

/// Query for one session by id.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

pub struct GetSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<Session, SchedulingError> {
        self.repository
            .find_by_id(&query.session_id)
            .await?
            .ok_or(SchedulingError::NotFound(query.session_id))
    }
}

/// Query for the session list, optionally filtered by exact status.
#[derive(Debug, Clone, Default)]
pub struct ListSessionsQuery {
    pub status: Option<SessionStatus>,
}

pub struct ListSessionsHandler {
    repository: Arc<dyn SessionRepository>,
}

impl ListSessionsHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListSessionsQuery) -> Result<Vec<Session>, SchedulingError> {
        self.repository.list(query.status).await
    }
}
