//! UpdateSessionHandler - Command handler for partial session updates.

use std::sync::Arc;

use crate::domain::foundation::{Role, SessionId, UserId};
use crate::domain::scheduling::{SchedulingError, Session, SessionPatch};
use crate::ports::SessionRepository;

/// Command to update a session with a partial field set.
#[derive(Debug, Clone)]
pub struct UpdateSessionCommand {
    pub session_id: SessionId,
    pub caller: UserId,
    pub caller_role: Role,
    pub patch: SessionPatch,
}

/// Handler for session updates.
///
/// The effective time window (patched fields overlaid on current values)
/// is re-validated even when only one end moved, and the tutor-overlap
/// check re-runs against the tutor's other scheduled sessions inside the
/// repository's per-tutor boundary.
pub struct UpdateSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl UpdateSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateSessionCommand) -> Result<Session, SchedulingError> {
        let mut session = self
            .repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(SchedulingError::NotFound(cmd.session_id))?;

        session.authorize_manage(&cmd.caller, cmd.caller_role)?;
        session.apply(cmd.patch)?;

        self.repository.update(session).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySessionRepository, InMemoryUserDirectory};
    use crate::application::handlers::session::{CreateSessionCommand, CreateSessionHandler};
    use crate::domain::foundation::SessionStatus;
    use crate::domain::scheduling::SessionDate;

    fn tutor() -> UserId {
        UserId::new("t-1").unwrap()
    }

    fn tomorrow() -> String {
        SessionDate::today().as_naive().succ_opt().unwrap().to_string()
    }

    async fn seeded() -> (Arc<InMemorySessionRepository>, Session) {
        let repo = Arc::new(InMemorySessionRepository::new());
        let create = CreateSessionHandler::new(
            repo.clone(),
            Arc::new(InMemoryUserDirectory::with_demo_accounts()),
        );
        let session = create
            .handle(CreateSessionCommand {
                tutor_id: tutor(),
                subject: "Databases".to_string(),
                date: tomorrow().parse().unwrap(),
                start_time: "14:00".parse().unwrap(),
                end_time: "16:00".parse().unwrap(),
                location: None,
                modality: None,
                link: None,
                max_students: Some(5),
            })
            .await
            .unwrap();
        (repo, session)
    }

    fn cmd(session: &Session, patch: SessionPatch) -> UpdateSessionCommand {
        UpdateSessionCommand {
            session_id: *session.id(),
            caller: tutor(),
            caller_role: Role::Tutor,
            patch,
        }
    }

    #[tokio::test]
    async fn applies_partial_patch() {
        let (repo, session) = seeded().await;
        let handler = UpdateSessionHandler::new(repo);

        let updated = handler
            .handle(cmd(
                &session,
                SessionPatch {
                    subject: Some("Advanced Databases".to_string()),
                    ..Default::default()
                },
            ))
            .await
            .unwrap();

        assert_eq!(updated.subject(), "Advanced Databases");
        assert_eq!(updated.slot(), session.slot());
    }

    #[tokio::test]
    async fn revalidates_duration_with_effective_times() {
        let (repo, session) = seeded().await;
        let handler = UpdateSessionHandler::new(repo);

        let result = handler
            .handle(cmd(
                &session,
                SessionPatch {
                    end_time: Some("14:10".parse().unwrap()),
                    ..Default::default()
                },
            ))
            .await;
        assert!(matches!(result, Err(SchedulingError::InvalidDuration)));
    }

    #[tokio::test]
    async fn rejects_overlap_with_other_session_but_not_self() {
        let (repo, session) = seeded().await;
        let create = CreateSessionHandler::new(
            repo.clone(),
            Arc::new(InMemoryUserDirectory::with_demo_accounts()),
        );
        create
            .handle(CreateSessionCommand {
                tutor_id: tutor(),
                subject: "Algorithms".to_string(),
                date: tomorrow().parse().unwrap(),
                start_time: "17:00".parse().unwrap(),
                end_time: "18:00".parse().unwrap(),
                location: None,
                modality: None,
                link: None,
                max_students: None,
            })
            .await
            .unwrap();

        let handler = UpdateSessionHandler::new(repo);

        // Moving onto the other session conflicts...
        let result = handler
            .handle(cmd(
                &session,
                SessionPatch {
                    start_time: Some("17:30".parse().unwrap()),
                    end_time: Some("18:30".parse().unwrap()),
                    ..Default::default()
                },
            ))
            .await;
        assert!(matches!(result, Err(SchedulingError::Conflict(_))));

        // ...but re-saving the session's own slot does not (self excluded).
        let result = handler
            .handle(cmd(
                &session,
                SessionPatch {
                    location: Some("Library".to_string()),
                    ..Default::default()
                },
            ))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn foreign_tutor_is_forbidden() {
        let (repo, session) = seeded().await;
        let handler = UpdateSessionHandler::new(repo);

        let result = handler
            .handle(UpdateSessionCommand {
                session_id: *session.id(),
                caller: UserId::new("t-2").unwrap(),
                caller_role: Role::Tutor,
                patch: SessionPatch::default(),
            })
            .await;
        assert!(matches!(result, Err(SchedulingError::Forbidden)));
    }

    #[tokio::test]
    async fn admin_may_update_and_cancel() {
        let (repo, session) = seeded().await;
        let handler = UpdateSessionHandler::new(repo);

        let updated = handler
            .handle(UpdateSessionCommand {
                session_id: *session.id(),
                caller: UserId::new("admin-1").unwrap(),
                caller_role: Role::Admin,
                patch: SessionPatch {
                    status: Some(SessionStatus::Cancelled),
                    ..Default::default()
                },
            })
            .await
            .unwrap();
        assert_eq!(updated.status(), SessionStatus::Cancelled);
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (repo, _) = seeded().await;
        let handler = UpdateSessionHandler::new(repo);

        let missing = SessionId::new();
        let result = handler
            .handle(UpdateSessionCommand {
                session_id: missing,
                caller: tutor(),
                caller_role: Role::Tutor,
                patch: SessionPatch::default(),
            })
            .await;
        assert!(matches!(result, Err(SchedulingError::NotFound(id)) if id == missing));
    }
}
