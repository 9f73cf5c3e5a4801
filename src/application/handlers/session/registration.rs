//! Registration handlers - students joining and leaving sessions.
//!
//! Both delegate to the repository, which owns the atomicity of the
//! capacity check plus roster append (see the `SessionRepository` docs).

use std::sync::Arc;

use crate::domain::foundation::{SessionId, UserId};
use crate::domain::scheduling::{SchedulingError, Session};
use crate::ports::SessionRepository;

/// Command for a student to register into a session.
#[derive(Debug, Clone)]
pub struct RegisterStudentCommand {
    pub session_id: SessionId,
    pub student: UserId,
}

pub struct RegisterStudentHandler {
    repository: Arc<dyn SessionRepository>,
}

impl RegisterStudentHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: RegisterStudentCommand) -> Result<Session, SchedulingError> {
        self.repository
            .register_student(&cmd.session_id, &cmd.student)
            .await
    }
}

/// Command for a student to leave a session.
#[derive(Debug, Clone)]
pub struct UnregisterStudentCommand {
    pub session_id: SessionId,
    pub student: UserId,
}

pub struct UnregisterStudentHandler {
    repository: Arc<dyn SessionRepository>,
}

impl UnregisterStudentHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UnregisterStudentCommand) -> Result<Session, SchedulingError> {
        self.repository
            .unregister_student(&cmd.session_id, &cmd.student)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySessionRepository, InMemoryUserDirectory};
    use crate::application::handlers::session::{CreateSessionCommand, CreateSessionHandler};
    use crate::domain::scheduling::SessionDate;

    fn student(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    fn tomorrow() -> SessionDate {
        SessionDate::today()
            .as_naive()
            .succ_opt()
            .unwrap()
            .to_string()
            .parse()
            .unwrap()
    }

    async fn seed(
        repo: Arc<InMemorySessionRepository>,
        start: &str,
        end: &str,
        max_students: u32,
    ) -> Session {
        CreateSessionHandler::new(
            repo,
            Arc::new(InMemoryUserDirectory::with_demo_accounts()),
        )
        .handle(CreateSessionCommand {
            tutor_id: student("t-1"),
            subject: "Databases".to_string(),
            date: tomorrow(),
            start_time: start.parse().unwrap(),
            end_time: end.parse().unwrap(),
            location: None,
            modality: None,
            link: None,
            max_students: Some(max_students),
        })
        .await
        .unwrap()
    }

    fn register(repo: &Arc<InMemorySessionRepository>) -> RegisterStudentHandler {
        RegisterStudentHandler::new(repo.clone())
    }

    fn unregister(repo: &Arc<InMemorySessionRepository>) -> UnregisterStudentHandler {
        UnregisterStudentHandler::new(repo.clone())
    }

    #[tokio::test]
    async fn full_registration_scenario() {
        // Tutor creates a two-seat session; S1 and S2 fill it, S3 bounces,
        // S1 leaves, S3 gets the seat.
        let repo = Arc::new(InMemorySessionRepository::new());
        let session = seed(repo.clone(), "14:00", "16:00", 2).await;
        let reg = register(&repo);

        let s = reg
            .handle(RegisterStudentCommand {
                session_id: *session.id(),
                student: student("s1"),
            })
            .await
            .unwrap();
        assert_eq!(s.registered(), 1);

        let s = reg
            .handle(RegisterStudentCommand {
                session_id: *session.id(),
                student: student("s2"),
            })
            .await
            .unwrap();
        assert_eq!(s.registered(), 2);

        let full = reg
            .handle(RegisterStudentCommand {
                session_id: *session.id(),
                student: student("s3"),
            })
            .await;
        assert!(matches!(full, Err(SchedulingError::Full)));

        let s = unregister(&repo)
            .handle(UnregisterStudentCommand {
                session_id: *session.id(),
                student: student("s1"),
            })
            .await
            .unwrap();
        assert_eq!(s.registered(), 1);

        let s = reg
            .handle(RegisterStudentCommand {
                session_id: *session.id(),
                student: student("s3"),
            })
            .await
            .unwrap();
        assert_eq!(s.registered(), 2);
    }

    #[tokio::test]
    async fn registering_twice_is_idempotent() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let session = seed(repo.clone(), "14:00", "16:00", 3).await;
        let reg = register(&repo);

        let first = reg
            .handle(RegisterStudentCommand {
                session_id: *session.id(),
                student: student("s1"),
            })
            .await
            .unwrap();
        let second = reg
            .handle(RegisterStudentCommand {
                session_id: *session.id(),
                student: student("s1"),
            })
            .await
            .unwrap();

        assert_eq!(first.roster(), second.roster());
        assert_eq!(second.registered(), 1);
    }

    #[tokio::test]
    async fn overlapping_registration_for_student_conflicts() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let morning = seed(repo.clone(), "09:00", "11:00", 5).await;

        // A second tutor's session overlapping the first.
        let other = CreateSessionHandler::new(
            repo.clone(),
            Arc::new(InMemoryUserDirectory::with_demo_accounts()),
        )
        .handle(CreateSessionCommand {
            tutor_id: student("t-2"),
            subject: "Algorithms".to_string(),
            date: tomorrow(),
            start_time: "10:00".parse().unwrap(),
            end_time: "12:00".parse().unwrap(),
            location: None,
            modality: None,
            link: None,
            max_students: None,
        })
        .await
        .unwrap();

        let reg = register(&repo);
        reg.handle(RegisterStudentCommand {
            session_id: *morning.id(),
            student: student("s1"),
        })
        .await
        .unwrap();

        let result = reg
            .handle(RegisterStudentCommand {
                session_id: *other.id(),
                student: student("s1"),
            })
            .await;
        assert!(matches!(result, Err(SchedulingError::Conflict(_))));
    }

    #[tokio::test]
    async fn back_to_back_registration_is_allowed() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let morning = seed(repo.clone(), "09:00", "10:00", 5).await;

        let later = CreateSessionHandler::new(
            repo.clone(),
            Arc::new(InMemoryUserDirectory::with_demo_accounts()),
        )
        .handle(CreateSessionCommand {
            tutor_id: student("t-2"),
            subject: "Algorithms".to_string(),
            date: tomorrow(),
            start_time: "10:00".parse().unwrap(),
            end_time: "11:00".parse().unwrap(),
            location: None,
            modality: None,
            link: None,
            max_students: None,
        })
        .await
        .unwrap();

        let reg = register(&repo);
        reg.handle(RegisterStudentCommand {
            session_id: *morning.id(),
            student: student("s1"),
        })
        .await
        .unwrap();

        let result = reg
            .handle(RegisterStudentCommand {
                session_id: *later.id(),
                student: student("s1"),
            })
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn unregistering_absent_student_is_noop_success() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let session = seed(repo.clone(), "14:00", "16:00", 2).await;

        let s = unregister(&repo)
            .handle(UnregisterStudentCommand {
                session_id: *session.id(),
                student: student("ghost"),
            })
            .await
            .unwrap();
        assert_eq!(s.registered(), 0);
    }

    #[tokio::test]
    async fn registering_into_missing_session_is_not_found() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let result = register(&repo)
            .handle(RegisterStudentCommand {
                session_id: SessionId::new(),
                student: student("s1"),
            })
            .await;
        assert!(matches!(result, Err(SchedulingError::NotFound(_))));
    }

    #[tokio::test]
    async fn concurrent_registrations_never_exceed_capacity() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let session = seed(repo.clone(), "14:00", "16:00", 1).await;

        let mut handles = Vec::new();
        for i in 0..8 {
            let repo = repo.clone();
            let id = *session.id();
            handles.push(tokio::spawn(async move {
                repo.register_student(&id, &student(&format!("s{}", i))).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }
        assert_eq!(successes, 1);

        let stored = repo.find_by_id(session.id()).await.unwrap().unwrap();
        assert_eq!(stored.registered(), 1);
    }
}
