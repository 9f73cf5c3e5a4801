//! Shared resource metadata.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ResourceId, Timestamp, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    #[default]
    Lecture,
    Exercise,
    Reference,
    Other,
}

/// Metadata for an uploaded document; the bytes live behind the
/// `FileStorage` port under `stored_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDoc {
    pub id: ResourceId,
    pub name: String,
    pub description: String,
    pub category: ResourceCategory,
    pub uploaded_by: UserId,
    pub uploaded_at: Timestamp,
    pub size_bytes: u64,
    /// File extension, lowercased, without the dot ("pdf", "docx", ...).
    pub kind: String,
    pub stored_name: String,
}

impl ResourceDoc {
    pub fn new(
        name: String,
        description: String,
        category: ResourceCategory,
        uploaded_by: UserId,
        size_bytes: u64,
        stored_name: String,
    ) -> Self {
        let kind = name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string());
        Self {
            id: ResourceId::new(),
            name,
            description,
            category,
            uploaded_by,
            uploaded_at: Timestamp::now(),
            size_bytes,
            kind,
            stored_name,
        }
    }
}
