//! In-memory implementation of NotificationStore.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, NotificationId, UserId};
use crate::domain::notification::{Notification, NotificationKind, NotificationStatus};
use crate::ports::NotificationStore;

#[derive(Debug, Default)]
pub struct InMemoryNotificationStore {
    notifications: RwLock<Vec<Notification>>,
}

impl InMemoryNotificationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn push(&self, notification: Notification) -> Result<(), DomainError> {
        // Newest first.
        self.notifications.write().await.insert(0, notification);
        Ok(())
    }

    async fn list(
        &self,
        recipient: &UserId,
        status: Option<NotificationStatus>,
        kind: Option<NotificationKind>,
    ) -> Result<Vec<Notification>, DomainError> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| &n.recipient_id == recipient)
            .filter(|n| status.map_or(true, |s| n.status == s))
            .filter(|n| kind.map_or(true, |k| n.kind == k))
            .cloned()
            .collect())
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient: &UserId,
    ) -> Result<Notification, DomainError> {
        let mut notifications = self.notifications.write().await;
        match notifications
            .iter_mut()
            .find(|n| &n.id == id && &n.recipient_id == recipient)
        {
            Some(n) => {
                n.mark_read();
                Ok(n.clone())
            }
            None => Err(DomainError::not_found("Notification")),
        }
    }

    async fn mark_all_read(&self, recipient: &UserId) -> Result<Vec<Notification>, DomainError> {
        let mut notifications = self.notifications.write().await;
        for n in notifications
            .iter_mut()
            .filter(|n| &n.recipient_id == recipient)
        {
            n.mark_read();
        }
        Ok(notifications
            .iter()
            .filter(|n| &n.recipient_id == recipient)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notification(recipient: &str, kind: NotificationKind) -> Notification {
        Notification::new(UserId::new(recipient).unwrap(), kind, "title", "content")
    }

    #[tokio::test]
    async fn list_filters_by_recipient_status_and_kind() {
        let store = InMemoryNotificationStore::new();
        store
            .push(notification("u-1", NotificationKind::Pairing))
            .await
            .unwrap();
        store
            .push(notification("u-1", NotificationKind::Session))
            .await
            .unwrap();
        store
            .push(notification("u-2", NotificationKind::Pairing))
            .await
            .unwrap();

        let recipient = UserId::new("u-1").unwrap();
        assert_eq!(store.list(&recipient, None, None).await.unwrap().len(), 2);
        assert_eq!(
            store
                .list(&recipient, None, Some(NotificationKind::Pairing))
                .await
                .unwrap()
                .len(),
            1
        );
        assert_eq!(
            store
                .list(&recipient, Some(NotificationStatus::Read), None)
                .await
                .unwrap()
                .len(),
            0
        );
    }

    #[tokio::test]
    async fn mark_all_read_touches_only_the_recipient() {
        let store = InMemoryNotificationStore::new();
        store
            .push(notification("u-1", NotificationKind::Pairing))
            .await
            .unwrap();
        store
            .push(notification("u-2", NotificationKind::Pairing))
            .await
            .unwrap();

        let recipient = UserId::new("u-1").unwrap();
        let after = store.mark_all_read(&recipient).await.unwrap();
        assert!(after.iter().all(|n| n.status == NotificationStatus::Read));

        let other = UserId::new("u-2").unwrap();
        let untouched = store.list(&other, None, None).await.unwrap();
        assert!(untouched.iter().all(|n| n.status == NotificationStatus::Unread));
    }

    #[tokio::test]
    async fn mark_read_is_recipient_scoped() {
        let store = InMemoryNotificationStore::new();
        store
            .push(notification("u-1", NotificationKind::Feedback))
            .await
            .unwrap();
        let id = store
            .list(&UserId::new("u-1").unwrap(), None, None)
            .await
            .unwrap()[0]
            .id;

        assert!(store
            .mark_read(&id, &UserId::new("u-2").unwrap())
            .await
            .is_err());
    }
}
