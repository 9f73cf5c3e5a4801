//! Notification store port.

use crate::domain::foundation::{DomainError, NotificationId, UserId};
use crate::domain::notification::{Notification, NotificationKind, NotificationStatus};
use async_trait::async_trait;

/// Port for notification storage. Other modules push through this seam;
/// users poll their own feed.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Appends a notification to the recipient's feed.
    async fn push(&self, notification: Notification) -> Result<(), DomainError>;

    /// The recipient's notifications, optionally filtered, newest first.
    async fn list(
        &self,
        recipient: &UserId,
        status: Option<NotificationStatus>,
        kind: Option<NotificationKind>,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Marks one notification read.
    ///
    /// # Errors
    ///
    /// - `NOT_FOUND` when the id is unknown or belongs to someone else
    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient: &UserId,
    ) -> Result<Notification, DomainError>;

    /// Marks everything read and returns the refreshed feed.
    async fn mark_all_read(&self, recipient: &UserId) -> Result<Vec<Notification>, DomainError>;
}
