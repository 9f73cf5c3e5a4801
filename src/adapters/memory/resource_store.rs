//! In-memory implementation of ResourceStore.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ResourceId};
use crate::domain::resource::ResourceDoc;
use crate::ports::ResourceStore;

#[derive(Debug, Default)]
pub struct InMemoryResourceStore {
    documents: RwLock<Vec<ResourceDoc>>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn insert(&self, doc: ResourceDoc) -> Result<ResourceDoc, DomainError> {
        // Newest first.
        self.documents.write().await.insert(0, doc.clone());
        Ok(doc)
    }

    async fn list(&self) -> Result<Vec<ResourceDoc>, DomainError> {
        Ok(self.documents.read().await.clone())
    }

    async fn find_by_id(&self, id: &ResourceId) -> Result<Option<ResourceDoc>, DomainError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|d| &d.id == id)
            .cloned())
    }

    async fn delete(&self, id: &ResourceId) -> Result<ResourceDoc, DomainError> {
        let mut documents = self.documents.write().await;
        match documents.iter().position(|d| &d.id == id) {
            Some(idx) => Ok(documents.remove(idx)),
            None => Err(DomainError::not_found("Resource")),
        }
    }
}
