//! Resource metadata store port.

use crate::domain::foundation::{DomainError, ResourceId};
use crate::domain::resource::ResourceDoc;
use async_trait::async_trait;

/// Port for resource metadata. File bytes live behind [`super::FileStorage`].
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn insert(&self, doc: ResourceDoc) -> Result<ResourceDoc, DomainError>;

    /// All resources, newest first.
    async fn list(&self) -> Result<Vec<ResourceDoc>, DomainError>;

    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<ResourceDoc>, DomainError>;

    /// Removes the metadata record.
    ///
    /// # Errors
    ///
    /// - `NOT_FOUND` if absent
    async fn delete(&self, id: &ResourceId) -> Result<ResourceDoc, DomainError>;
}
