//! In-memory implementation of FeedbackRepository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::feedback::FeedbackEntry;
use crate::domain::foundation::{DomainError, FeedbackId, UserId};
use crate::ports::FeedbackRepository;

#[derive(Debug, Default)]
pub struct InMemoryFeedbackRepository {
    entries: RwLock<Vec<FeedbackEntry>>,
}

impl InMemoryFeedbackRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackRepository {
    async fn insert(&self, entry: FeedbackEntry) -> Result<FeedbackEntry, DomainError> {
        // Newest first, matching listing expectations.
        self.entries.write().await.insert(0, entry.clone());
        Ok(entry)
    }

    async fn list_by_student(&self, student: &UserId) -> Result<Vec<FeedbackEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|f| &f.student_id == student)
            .cloned()
            .collect())
    }

    async fn list_by_tutor(&self, tutor: &UserId) -> Result<Vec<FeedbackEntry>, DomainError> {
        Ok(self
            .entries
            .read()
            .await
            .iter()
            .filter(|f| &f.tutor_id == tutor)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<FeedbackEntry>, DomainError> {
        Ok(self.entries.read().await.clone())
    }

    async fn mark_viewed(
        &self,
        id: &FeedbackId,
        tutor: &UserId,
    ) -> Result<FeedbackEntry, DomainError> {
        let mut entries = self.entries.write().await;
        match entries
            .iter_mut()
            .find(|f| &f.id == id && &f.tutor_id == tutor)
        {
            Some(entry) => {
                entry.tutor_viewed = true;
                Ok(entry.clone())
            }
            None => Err(DomainError::not_found("Feedback")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::feedback::Ratings;
    use crate::domain::foundation::SessionId;

    fn entry(student: &str, tutor: &str) -> FeedbackEntry {
        FeedbackEntry::new(
            SessionId::new(),
            UserId::new(student).unwrap(),
            "Student".to_string(),
            UserId::new(tutor).unwrap(),
            "Tutor".to_string(),
            "Databases".to_string(),
            Ratings {
                quality: 5,
                knowledge: 4,
                communication: 5,
                helpfulness: 4,
                time_management: 5,
            },
            String::new(),
            String::new(),
            "Great session overall.".to_string(),
            true,
            false,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn listings_are_newest_first() {
        let repo = InMemoryFeedbackRepository::new();
        let first = repo.insert(entry("s-1", "t-1")).await.unwrap();
        let second = repo.insert(entry("s-1", "t-1")).await.unwrap();

        let all = repo.list_all().await.unwrap();
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[tokio::test]
    async fn mark_viewed_is_tutor_scoped() {
        let repo = InMemoryFeedbackRepository::new();
        let stored = repo.insert(entry("s-1", "t-1")).await.unwrap();

        let other = UserId::new("t-2").unwrap();
        assert!(repo.mark_viewed(&stored.id, &other).await.is_err());

        let owner = UserId::new("t-1").unwrap();
        let marked = repo.mark_viewed(&stored.id, &owner).await.unwrap();
        assert!(marked.tutor_viewed);
    }
}
