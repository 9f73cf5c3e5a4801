//! HTTP adapter for shared resource endpoints.

mod handlers;

pub use handlers::ResourceHandlers;

use axum::{
    routing::{delete, get, post},
    Router,
};

pub fn resource_routes(state: ResourceHandlers) -> Router {
    Router::new()
        .route("/", get(handlers::list_resources))
        .route("/upload", post(handlers::upload_resource))
        .route("/:id/download", get(handlers::download_resource))
        .route("/:id", delete(handlers::delete_resource))
        .with_state(state)
}
