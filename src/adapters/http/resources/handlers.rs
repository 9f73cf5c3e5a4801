//! HTTP handlers for shared resource endpoints.

use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::adapters::http::middleware::{ensure_role, RequireAuth};
use crate::adapters::http::response::{created, domain_failure, failure, ok};
use crate::domain::foundation::{ErrorCode, ResourceId, Role};
use crate::domain::resource::{ResourceCategory, ResourceDoc};
use crate::ports::{FileStorage, ResourceStore};

#[derive(Clone)]
pub struct ResourceHandlers {
    resources: Arc<dyn ResourceStore>,
    files: Arc<dyn FileStorage>,
}

impl ResourceHandlers {
    pub fn new(resources: Arc<dyn ResourceStore>, files: Arc<dyn FileStorage>) -> Self {
        Self { resources, files }
    }
}

/// GET /api/resources
pub async fn list_resources(
    State(handlers): State<ResourceHandlers>,
    RequireAuth(_user): RequireAuth,
) -> Response {
    match handlers.resources.list().await {
        Ok(docs) => ok(docs),
        Err(e) => domain_failure(e),
    }
}

/// POST /api/resources/upload (tutor/admin, multipart)
///
/// Expects a `file` part plus optional `description` and `category` text
/// parts.
pub async fn upload_resource(
    State(handlers): State<ResourceHandlers>,
    RequireAuth(user): RequireAuth,
    mut multipart: Multipart,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Tutor, Role::Admin]) {
        return resp;
    }

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut description = String::new();
    let mut category = ResourceCategory::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return failure(ErrorCode::InvalidInput, "Malformed upload"),
        };

        let part = field.name().map(str::to_string);
        match part.as_deref() {
            Some("file") => {
                let name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "upload.bin".to_string());
                match field.bytes().await {
                    Ok(bytes) => file = Some((name, bytes.to_vec())),
                    Err(_) => return failure(ErrorCode::InvalidInput, "Malformed upload"),
                }
            }
            Some("description") => {
                description = field.text().await.unwrap_or_default();
            }
            Some("category") => {
                let raw = field.text().await.unwrap_or_default();
                category = match raw.as_str() {
                    "" | "lecture" => ResourceCategory::Lecture,
                    "exercise" => ResourceCategory::Exercise,
                    "reference" => ResourceCategory::Reference,
                    _ => ResourceCategory::Other,
                };
            }
            _ => {}
        }
    }

    let (name, bytes) = match file {
        Some(file) => file,
        None => return failure(ErrorCode::InvalidInput, "No file selected"),
    };

    let stored_name = match handlers.files.save(&name, &bytes).await {
        Ok(stored_name) => stored_name,
        Err(e) => return domain_failure(e),
    };

    let doc = ResourceDoc::new(
        name,
        description,
        category,
        user.id,
        bytes.len() as u64,
        stored_name,
    );

    match handlers.resources.insert(doc).await {
        Ok(doc) => created(doc),
        Err(e) => domain_failure(e),
    }
}

/// GET /api/resources/:id/download
pub async fn download_resource(
    State(handlers): State<ResourceHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<ResourceId>() {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "Resource not found"),
    };
    let doc = match handlers.resources.find_by_id(&id).await {
        Ok(Some(doc)) => doc,
        Ok(None) => return failure(ErrorCode::NotFound, "Resource not found"),
        Err(e) => return domain_failure(e),
    };
    let bytes = match handlers.files.load(&doc.stored_name).await {
        Ok(bytes) => bytes,
        Err(e) => return domain_failure(e),
    };

    (
        StatusCode::OK,
        [
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", doc.name),
            ),
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
        ],
        bytes,
    )
        .into_response()
}

/// DELETE /api/resources/:id (tutor/admin)
pub async fn delete_resource(
    State(handlers): State<ResourceHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Tutor, Role::Admin]) {
        return resp;
    }
    let id = match id.parse::<ResourceId>() {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "Resource not found"),
    };

    let doc = match handlers.resources.delete(&id).await {
        Ok(doc) => doc,
        Err(e) => return domain_failure(e),
    };
    if let Err(e) = handlers.files.remove(&doc.stored_name).await {
        return domain_failure(e);
    }

    ok(json!({ "message": "Resource deleted" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryResourceStore;
    use crate::adapters::storage::LocalFileStorage;
    use crate::domain::foundation::{AuthenticatedUser, UserId};

    fn tutor() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("t-1").unwrap(), Role::Tutor, None)
    }

    #[tokio::test]
    async fn delete_removes_metadata_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let files: Arc<dyn FileStorage> = Arc::new(LocalFileStorage::new(dir.path()));
        let resources: Arc<dyn ResourceStore> = Arc::new(InMemoryResourceStore::new());
        let handlers = ResourceHandlers::new(resources.clone(), files.clone());

        let stored_name = files.save("notes.pdf", b"bytes").await.unwrap();
        let doc = resources
            .insert(ResourceDoc::new(
                "notes.pdf".to_string(),
                String::new(),
                ResourceCategory::Lecture,
                UserId::new("t-1").unwrap(),
                5,
                stored_name.clone(),
            ))
            .await
            .unwrap();

        let response = delete_resource(
            State(handlers),
            RequireAuth(tutor()),
            Path(doc.id.to_string()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(files.load(&stored_name).await.is_err());
    }

    #[tokio::test]
    async fn download_missing_resource_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let handlers = ResourceHandlers::new(
            Arc::new(InMemoryResourceStore::new()),
            Arc::new(LocalFileStorage::new(dir.path())),
        );

        let response = download_resource(
            State(handlers),
            RequireAuth(tutor()),
            Path(ResourceId::new().to_string()),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
