//! HTTP adapter for pairing endpoints.
//!
//! Mounted at the API root: `/tutors`, `/tutor/pair-requests`, `/paired`.

mod handlers;

pub use handlers::{PairingHandlers, TutorEntry};

use axum::{
    routing::{get, post, put},
    Router,
};

/// Pairing routes, mounted at the API root.
pub fn pairing_routes(state: PairingHandlers) -> Router {
    Router::new()
        .route("/tutors", get(handlers::list_tutors))
        .route("/tutors/:id/pair-request", post(handlers::send_pair_request))
        .route("/tutor/pair-requests", get(handlers::tutor_requests))
        .route("/tutor/pair-requests/:id", put(handlers::resolve_request))
        .route("/paired", get(handlers::paired))
        .with_state(state)
}
