//! In-memory implementation of PairingRepository.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PairRequestId, UserId};
use crate::domain::pairing::{PairRequest, PairStatus};
use crate::ports::PairingRepository;

#[derive(Debug, Default)]
pub struct InMemoryPairingRepository {
    requests: RwLock<Vec<PairRequest>>,
}

impl InMemoryPairingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PairingRepository for InMemoryPairingRepository {
    async fn insert(&self, request: PairRequest) -> Result<PairRequest, DomainError> {
        let mut requests = self.requests.write().await;
        let duplicate = requests.iter().any(|r| {
            r.student_id == request.student_id
                && r.tutor_id == request.tutor_id
                && r.is_pending()
        });
        if duplicate {
            return Err(DomainError::new(
                ErrorCode::Duplicate,
                "A pending request to this tutor already exists",
            ));
        }
        requests.push(request.clone());
        Ok(request)
    }

    async fn list_for_tutor(&self, tutor: &UserId) -> Result<Vec<PairRequest>, DomainError> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .filter(|r| &r.tutor_id == tutor)
            .cloned()
            .collect())
    }

    async fn list_for_user_with_status(
        &self,
        user: &UserId,
        status: PairStatus,
    ) -> Result<Vec<PairRequest>, DomainError> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .filter(|r| r.status == status && (&r.student_id == user || &r.tutor_id == user))
            .cloned()
            .collect())
    }

    async fn find_for_tutor(
        &self,
        id: &PairRequestId,
        tutor: &UserId,
    ) -> Result<Option<PairRequest>, DomainError> {
        Ok(self
            .requests
            .read()
            .await
            .iter()
            .find(|r| &r.id == id && &r.tutor_id == tutor)
            .cloned())
    }

    async fn save(&self, request: PairRequest) -> Result<PairRequest, DomainError> {
        let mut requests = self.requests.write().await;
        match requests.iter_mut().find(|r| r.id == request.id) {
            Some(slot) => {
                *slot = request.clone();
                Ok(request)
            }
            None => Err(DomainError::not_found("Pair request")),
        }
    }
}
