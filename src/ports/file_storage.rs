//! File storage port for uploaded resources.

use crate::domain::foundation::DomainError;
use async_trait::async_trait;

/// Port for raw file persistence.
///
/// `save` returns the opaque stored name under which the bytes can be
/// loaded back; callers keep it in the resource metadata. No durability
/// guarantees are made.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persists the bytes and returns the stored name.
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, DomainError>;

    /// Loads previously stored bytes.
    ///
    /// # Errors
    ///
    /// - `NOT_FOUND` when no file exists under `stored_name`
    async fn load(&self, stored_name: &str) -> Result<Vec<u8>, DomainError>;

    /// Removes the stored file; absent files are a no-op.
    async fn remove(&self, stored_name: &str) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_storage_is_object_safe() {
        fn _accepts_dyn(_storage: &dyn FileStorage) {}
    }
}
