//! HTTP adapter for admin reporting endpoints.

mod handlers;

pub use handlers::ReportHandlers;

use axum::{routing::get, Router};

pub fn report_routes(state: ReportHandlers) -> Router {
    Router::new()
        .route("/overview", get(handlers::overview))
        .route("/feedback-summary", get(handlers::feedback_summary))
        .with_state(state)
}
