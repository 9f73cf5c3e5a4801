//! DeleteSessionHandler - Command handler for deleting sessions.

use std::sync::Arc;

use crate::domain::foundation::{Role, SessionId, UserId};
use crate::domain::scheduling::SchedulingError;
use crate::ports::SessionRepository;

/// Command to delete a session.
#[derive(Debug, Clone)]
pub struct DeleteSessionCommand {
    pub session_id: SessionId,
    pub caller: UserId,
    pub caller_role: Role,
}

pub struct DeleteSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl DeleteSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeleteSessionCommand) -> Result<(), SchedulingError> {
        let session = self
            .repository
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(SchedulingError::NotFound(cmd.session_id))?;

        session.authorize_manage(&cmd.caller, cmd.caller_role)?;
        self.repository.delete(&cmd.session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySessionRepository, InMemoryUserDirectory};
    use crate::application::handlers::session::{CreateSessionCommand, CreateSessionHandler};
    use crate::domain::scheduling::SessionDate;

    fn tomorrow() -> SessionDate {
        SessionDate::today()
            .as_naive()
            .succ_opt()
            .unwrap()
            .to_string()
            .parse()
            .unwrap()
    }

    #[tokio::test]
    async fn owner_deletes_and_session_disappears() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let create = CreateSessionHandler::new(
            repo.clone(),
            Arc::new(InMemoryUserDirectory::with_demo_accounts()),
        );
        let session = create
            .handle(CreateSessionCommand {
                tutor_id: UserId::new("t-1").unwrap(),
                subject: "Databases".to_string(),
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

        let handler = DeleteSessionHandler::new(repo.clone());
        handler
            .handle(DeleteSessionCommand {
                session_id: *session.id(),
                caller: UserId::new("t-1").unwrap(),
                caller_role: Role::Tutor,
            })
            .await
            .unwrap();

        assert!(repo.find_by_id(session.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn deleting_missing_session_is_not_found() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let handler = DeleteSessionHandler::new(repo);

        let result = handler
            .handle(DeleteSessionCommand {
                session_id: SessionId::new(),
                caller: UserId::new("t-1").unwrap(),
                caller_role: Role::Tutor,
            })
            .await;
        assert!(matches!(result, Err(SchedulingError::NotFound(_))));
    }
}
