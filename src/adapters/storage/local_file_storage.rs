//! Local filesystem implementation of FileStorage.
//!
//! Stores uploaded resource files under a single base directory with
//! collision-free generated names. Makes no durability guarantees.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::FileStorage;

/// Maximum upload size (20 MB).
pub const MAX_FILE_SIZE_BYTES: usize = 20 * 1024 * 1024;

/// Filesystem storage rooted at a base directory.
#[derive(Debug, Clone)]
pub struct LocalFileStorage {
    base_path: PathBuf,
}

impl LocalFileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn path_for(&self, stored_name: &str) -> Result<PathBuf, DomainError> {
        // Stored names are generated by `save`; reject anything that could
        // escape the base directory.
        if stored_name.contains('/') || stored_name.contains('\\') || stored_name.contains("..") {
            return Err(DomainError::not_found("File"));
        }
        Ok(self.base_path.join(stored_name))
    }

    fn storage_error(e: std::io::Error) -> DomainError {
        DomainError::new(ErrorCode::ServerError, format!("File storage error: {}", e))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String, DomainError> {
        if bytes.len() > MAX_FILE_SIZE_BYTES {
            return Err(DomainError::new(
                ErrorCode::InvalidInput,
                "File exceeds the 20 MB upload limit",
            ));
        }

        fs::create_dir_all(&self.base_path)
            .await
            .map_err(Self::storage_error)?;

        // Keep the extension for serving, generate the rest.
        let extension = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();
        let stored_name = format!("{}{}", Uuid::new_v4(), extension);

        fs::write(self.base_path.join(&stored_name), bytes)
            .await
            .map_err(Self::storage_error)?;

        Ok(stored_name)
    }

    async fn load(&self, stored_name: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.path_for(stored_name)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(DomainError::not_found("File"))
            }
            Err(e) => Err(Self::storage_error(e)),
        }
    }

    async fn remove(&self, stored_name: &str) -> Result<(), DomainError> {
        let path = self.path_for(stored_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Self::storage_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, LocalFileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(dir.path());
        (dir, storage)
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (_dir, storage) = storage();
        let stored = storage.save("notes.pdf", b"file-bytes").await.unwrap();

        assert!(stored.ends_with(".pdf"));
        let loaded = storage.load(&stored).await.unwrap();
        assert_eq!(loaded, b"file-bytes");
    }

    #[tokio::test]
    async fn saved_names_are_unique() {
        let (_dir, storage) = storage();
        let a = storage.save("x.txt", b"a").await.unwrap();
        let b = storage.save("x.txt", b"b").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn load_missing_file_is_not_found() {
        let (_dir, storage) = storage();
        let result = storage.load("missing.bin").await;
        assert!(matches!(result, Err(e) if e.code == ErrorCode::NotFound));
    }

    #[tokio::test]
    async fn remove_is_idempotent() {
        let (_dir, storage) = storage();
        let stored = storage.save("x.txt", b"a").await.unwrap();
        storage.remove(&stored).await.unwrap();
        storage.remove(&stored).await.unwrap();
        assert!(storage.load(&stored).await.is_err());
    }

    #[tokio::test]
    async fn path_traversal_is_rejected() {
        let (_dir, storage) = storage();
        assert!(storage.load("../etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let (_dir, storage) = storage();
        let big = vec![0u8; MAX_FILE_SIZE_BYTES + 1];
        let result = storage.save("big.bin", &big).await;
        assert!(matches!(result, Err(e) if e.code == ErrorCode::InvalidInput));
    }
}
