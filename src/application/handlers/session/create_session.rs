//! CreateSessionHandler - Command handler for creating sessions.

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::scheduling::{
    ClockTime, Modality, SchedulingError, Session, SessionDate, TimeSlot, DEFAULT_MAX_STUDENTS,
};
use crate::ports::{SessionRepository, UserDirectory};

/// Command to create a new session. The owning tutor is the caller.
#[derive(Debug, Clone)]
pub struct CreateSessionCommand {
    pub tutor_id: UserId,
    pub subject: String,
    pub date: SessionDate,
    pub start_time: ClockTime,
    pub end_time: ClockTime,
    pub location: Option<String>,
    pub modality: Option<Modality>,
    pub link: Option<String>,
    pub max_students: Option<u32>,
}

/// Handler for creating sessions.
///
/// Validation order follows the scheduling rules: past date, then minimum
/// duration, then the tutor-overlap check (which runs inside the
/// repository's per-tutor boundary).
pub struct CreateSessionHandler {
    repository: Arc<dyn SessionRepository>,
    users: Arc<dyn UserDirectory>,
}

impl CreateSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>, users: Arc<dyn UserDirectory>) -> Self {
        Self { repository, users }
    }

    pub async fn handle(&self, cmd: CreateSessionCommand) -> Result<Session, SchedulingError> {
        // 1. No past-dated creation.
        if cmd.date.is_before(&SessionDate::today()) {
            return Err(SchedulingError::InvalidTime);
        }

        // 2. Minimum duration.
        let slot = TimeSlot::new(cmd.date, cmd.start_time, cmd.end_time)?;

        // Denormalized tutor name for listings; the account may be missing
        // in demo data, so fall back to a generic label.
        let tutor_name = self
            .users
            .find_by_id(&cmd.tutor_id)
            .await
            .map_err(SchedulingError::from)?
            .map(|u| u.name)
            .unwrap_or_else(|| "Tutor".to_string());

        let session = Session::new(
            SessionId::new(),
            cmd.tutor_id,
            tutor_name,
            cmd.subject,
            slot,
            cmd.location.unwrap_or_else(|| "Online".to_string()),
            cmd.modality.unwrap_or_default(),
            cmd.link.filter(|l| !l.is_empty()),
            cmd.max_students.unwrap_or(DEFAULT_MAX_STUDENTS),
        )?;

        // 3. Tutor-overlap check and insert, atomically.
        self.repository.create(session).await
    }
}
