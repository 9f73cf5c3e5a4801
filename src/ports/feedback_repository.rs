//! Feedback repository port.

use crate::domain::feedback::FeedbackEntry;
use crate::domain::foundation::{DomainError, FeedbackId, UserId};
use async_trait::async_trait;

/// Port for feedback storage.
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Stores an entry (newest first in listings).
    async fn insert(&self, entry: FeedbackEntry) -> Result<FeedbackEntry, DomainError>;

    /// Entries authored by a student.
    async fn list_by_student(&self, student: &UserId) -> Result<Vec<FeedbackEntry>, DomainError>;

    /// Entries addressed to a tutor.
    async fn list_by_tutor(&self, tutor: &UserId) -> Result<Vec<FeedbackEntry>, DomainError>;

    /// All entries (admin view, reporting).
    async fn list_all(&self) -> Result<Vec<FeedbackEntry>, DomainError>;

    /// Marks an entry viewed by its tutor.
    ///
    /// # Errors
    ///
    /// - `NOT_FOUND` when the id is unknown or belongs to another tutor
    async fn mark_viewed(
        &self,
        id: &FeedbackId,
        tutor: &UserId,
    ) -> Result<FeedbackEntry, DomainError>;
}
