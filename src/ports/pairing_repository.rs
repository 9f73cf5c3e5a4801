//! Pairing repository port.

use crate::domain::foundation::{DomainError, PairRequestId, UserId};
use crate::domain::pairing::{PairRequest, PairStatus};
use async_trait::async_trait;

/// Port for pairing request storage.
#[async_trait]
pub trait PairingRepository: Send + Sync {
    /// Stores a new request.
    ///
    /// # Errors
    ///
    /// - `DUPLICATE` if a pending request already exists for the same
    ///   student/tutor pair
    async fn insert(&self, request: PairRequest) -> Result<PairRequest, DomainError>;

    /// All requests addressed to a tutor.
    async fn list_for_tutor(&self, tutor: &UserId) -> Result<Vec<PairRequest>, DomainError>;

    /// Requests with the given status where the user appears as student or
    /// tutor.
    async fn list_for_user_with_status(
        &self,
        user: &UserId,
        status: PairStatus,
    ) -> Result<Vec<PairRequest>, DomainError>;

    /// A request by id, scoped to its tutor. Returns `None` when the id is
    /// unknown or belongs to another tutor.
    async fn find_for_tutor(
        &self,
        id: &PairRequestId,
        tutor: &UserId,
    ) -> Result<Option<PairRequest>, DomainError>;

    /// Persists an updated request.
    async fn save(&self, request: PairRequest) -> Result<PairRequest, DomainError>;
}
