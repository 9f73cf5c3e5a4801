//! Session repository port.
//!
//! Defines the contract for persisting Session aggregates and for the
//! operations whose atomicity the scheduling rules depend on.
//!
//! # Atomicity contract
//!
//! - `create` / `update` run the tutor-overlap check and the write as one
//!   unit inside a per-tutor serialization boundary: two concurrent
//!   mutations for the same tutor must not both pass the check.
//! - `register_student` runs the status, idempotency, and capacity checks
//!   and the roster append as one unit per session: two concurrent
//!   registrations must not both succeed past capacity. It also performs
//!   the student-overlap check against the student's other scheduled
//!   registrations.
//!
//! Implementations: a transactional PostgreSQL table or a guarded
//! in-memory map.

use crate::domain::foundation::{SessionId, SessionStatus, UserId};
use crate::domain::scheduling::{SchedulingError, Session};
use async_trait::async_trait;

/// Repository port for Session aggregate persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists a new session after checking it against the tutor's other
    /// `scheduled` sessions.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the slot overlaps one of the tutor's scheduled sessions
    /// - `Infrastructure` on persistence failure
    async fn create(&self, session: Session) -> Result<Session, SchedulingError>;

    /// Persists changes to an existing session after re-checking the
    /// tutor's other `scheduled` sessions (the session itself excluded).
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session no longer exists
    /// - `Conflict` if the effective slot overlaps another scheduled session
    /// - `Infrastructure` on persistence failure
    async fn update(&self, session: Session) -> Result<Session, SchedulingError>;

    /// Deletes a session.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session doesn't exist
    async fn delete(&self, id: &SessionId) -> Result<(), SchedulingError>;

    /// Finds a session by its ID. Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SchedulingError>;

    /// Lists sessions, optionally filtered by exact status.
    async fn list(&self, status: Option<SessionStatus>) -> Result<Vec<Session>, SchedulingError>;

    /// Registers a student: status, idempotency, capacity, and
    /// student-overlap checks plus the roster append, atomically.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session doesn't exist
    /// - `NotAvailable` if the session is not `scheduled`
    /// - `Full` if a new student would exceed capacity
    /// - `Conflict` if the student holds an overlapping scheduled registration
    async fn register_student(
        &self,
        id: &SessionId,
        student: &UserId,
    ) -> Result<Session, SchedulingError>;

    /// Removes a student from the roster; a no-op when absent.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the session doesn't exist
    async fn unregister_student(
        &self,
        id: &SessionId,
        student: &UserId,
    ) -> Result<Session, SchedulingError>;

    /// Completed sessions whose roster contains the student (feedback
    /// candidates).
    async fn list_completed_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<Session>, SchedulingError>;

    /// Total number of sessions (reporting).
    async fn count(&self) -> Result<u64, SchedulingError>;
}
