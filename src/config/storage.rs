//! File storage configuration

use serde::Deserialize;
use std::path::PathBuf;

/// Storage configuration for uploaded resources
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for uploaded resource files
    #[serde(default = "default_resource_dir")]
    pub resource_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            resource_dir: default_resource_dir(),
        }
    }
}

fn default_resource_dir() -> PathBuf {
    PathBuf::from("uploads/resources")
}
