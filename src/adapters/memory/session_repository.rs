//! In-memory implementation of SessionRepository.
//!
//! A guarded map: every operation takes the store's write or read lock, so
//! the capacity-check-plus-append and the overlap-check-plus-insert are
//! trivially atomic. Backs tests and demo mode; the PostgreSQL adapter is
//! the production path.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use crate::domain::foundation::{SessionId, SessionStatus, UserId};
use crate::domain::scheduling::{RegistrationOutcome, SchedulingError, Session};
use crate::ports::SessionRepository;

/// Guarded-map session store.
#[derive(Debug, Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<SessionId, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `candidate` overlaps any other `scheduled` session of the
    /// same tutor. Caller must hold the lock.
    fn tutor_conflict(
        sessions: &HashMap<SessionId, Session>,
        candidate: &Session,
    ) -> bool {
        sessions.values().any(|other| {
            other.id() != candidate.id()
                && other.tutor_id() == candidate.tutor_id()
                && other.status().is_open()
                && other.slot().overlaps(candidate.slot())
        })
    }

    /// True if the student holds a `scheduled` registration overlapping
    /// `candidate`, excluding `candidate` itself. Caller must hold the lock.
    fn student_conflict(
        sessions: &HashMap<SessionId, Session>,
        candidate: &Session,
        student: &UserId,
    ) -> bool {
        sessions.values().any(|other| {
            other.id() != candidate.id()
                && other.status().is_open()
                && other.has_student(student)
                && other.slot().overlaps(candidate.slot())
        })
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn create(&self, session: Session) -> Result<Session, SchedulingError> {
        let mut sessions = self.sessions.write().await;
        if Self::tutor_conflict(&sessions, &session) {
            return Err(SchedulingError::conflict(
                "Overlaps one of your scheduled sessions",
            ));
        }
        sessions.insert(*session.id(), session.clone());
        Ok(session)
    }

    async fn update(&self, session: Session) -> Result<Session, SchedulingError> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(session.id()) {
            return Err(SchedulingError::NotFound(*session.id()));
        }
        if Self::tutor_conflict(&sessions, &session) {
            return Err(SchedulingError::conflict(
                "Overlaps one of your scheduled sessions",
            ));
        }
        sessions.insert(*session.id(), session.clone());
        Ok(session)
    }

    async fn delete(&self, id: &SessionId) -> Result<(), SchedulingError> {
        let mut sessions = self.sessions.write().await;
        sessions
            .remove(id)
            .map(|_| ())
            .ok_or(SchedulingError::NotFound(*id))
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, SchedulingError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn list(&self, status: Option<SessionStatus>) -> Result<Vec<Session>, SchedulingError> {
        let sessions = self.sessions.read().await;
        let mut result: Vec<Session> = sessions
            .values()
            .filter(|s| status.map_or(true, |wanted| s.status() == wanted))
            .cloned()
            .collect();
        // HashMap iteration order is arbitrary; present a calendar order.
        result.sort_by_key(|s| (s.slot().date(), s.slot().start(), *s.id().as_uuid()));
        Ok(result)
    }

    async fn register_student(
        &self,
        id: &SessionId,
        student: &UserId,
    ) -> Result<Session, SchedulingError> {
        let mut sessions = self.sessions.write().await;
        let mut session = sessions
            .get(id)
            .cloned()
            .ok_or(SchedulingError::NotFound(*id))?;

        match session.register(student.clone())? {
            RegistrationOutcome::AlreadyRegistered => Ok(session),
            RegistrationOutcome::Added => {
                if Self::student_conflict(&sessions, &session, student) {
                    return Err(SchedulingError::conflict(
                        "Overlaps a session you are already registered for",
                    ));
                }
                sessions.insert(*id, session.clone());
                Ok(session)
            }
        }
    }

    async fn unregister_student(
        &self,
        id: &SessionId,
        student: &UserId,
    ) -> Result<Session, SchedulingError> {
        let mut sessions = self.sessions.write().await;
        let mut session = sessions
            .get(id)
            .cloned()
            .ok_or(SchedulingError::NotFound(*id))?;

        session.unregister(student);
        sessions.insert(*id, session.clone());
        Ok(session)
    }

    async fn list_completed_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<Session>, SchedulingError> {
        let sessions = self.sessions.read().await;
        let mut result: Vec<Session> = sessions
            .values()
            .filter(|s| s.status() == SessionStatus::Completed && s.has_student(student))
            .cloned()
            .collect();
        result.sort_by_key(|s| (s.slot().date(), s.slot().start(), *s.id().as_uuid()));
        Ok(result)
    }

    async fn count(&self) -> Result<u64, SchedulingError> {
        Ok(self.sessions.read().await.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scheduling::{Modality, TimeSlot};

    fn session(tutor: &str, date: &str, start: &str, end: &str, max: u32) -> Session {
        Session::new(
            SessionId::new(),
            UserId::new(tutor).unwrap(),
            "Tutor".to_string(),
            "Subject".to_string(),
            TimeSlot::new(
                date.parse().unwrap(),
                start.parse().unwrap(),
                end.parse().unwrap(),
            )
            .unwrap(),
            "Online".to_string(),
            Modality::Online,
            None,
            max,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_rejects_tutor_overlap() {
        let repo = InMemorySessionRepository::new();
        repo.create(session("t-1", "2026-04-01", "09:00", "11:00", 5))
            .await
            .unwrap();

        let result = repo
            .create(session("t-1", "2026-04-01", "10:00", "12:00", 5))
            .await;
        assert!(matches!(result, Err(SchedulingError::Conflict(_))));
    }

    #[tokio::test]
    async fn create_allows_overlap_for_other_tutor() {
        let repo = InMemorySessionRepository::new();
        repo.create(session("t-1", "2026-04-01", "09:00", "11:00", 5))
            .await
            .unwrap();
        assert!(repo
            .create(session("t-2", "2026-04-01", "09:00", "11:00", 5))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn cancelled_sessions_do_not_block_creation() {
        let repo = InMemorySessionRepository::new();
        let mut s = session("t-1", "2026-04-01", "09:00", "11:00", 5);
        s.apply(crate::domain::scheduling::SessionPatch {
            status: Some(SessionStatus::Cancelled),
            ..Default::default()
        })
        .unwrap();
        repo.create(s).await.unwrap();

        assert!(repo
            .create(session("t-1", "2026-04-01", "09:00", "11:00", 5))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn list_is_ordered_by_date_and_start() {
        let repo = InMemorySessionRepository::new();
        repo.create(session("t-1", "2026-04-02", "09:00", "10:00", 5))
            .await
            .unwrap();
        repo.create(session("t-1", "2026-04-01", "13:00", "14:00", 5))
            .await
            .unwrap();
        repo.create(session("t-1", "2026-04-01", "09:00", "10:00", 5))
            .await
            .unwrap();

        let listed = repo.list(None).await.unwrap();
        let starts: Vec<String> = listed
            .iter()
            .map(|s| format!("{} {}", s.slot().date(), s.slot().start()))
            .collect();
        assert_eq!(
            starts,
            vec![
                "2026-04-01 09:00",
                "2026-04-01 13:00",
                "2026-04-02 09:00"
            ]
        );
    }

    #[tokio::test]
    async fn register_is_atomic_with_capacity() {
        let repo = std::sync::Arc::new(InMemorySessionRepository::new());
        let s = session("t-1", "2026-04-01", "09:00", "10:00", 2);
        let id = *s.id();
        repo.create(s).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..10 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.register_student(&id, &UserId::new(format!("s{}", i)).unwrap())
                    .await
            }));
        }
        let successes = {
            let mut n = 0;
            for h in handles {
                if h.await.unwrap().is_ok() {
                    n += 1;
                }
            }
            n
        };
        assert_eq!(successes, 2);

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.registered(), 2);
    }
}
