//! HTTP adapters - the REST API surface.
//!
//! Each module has its own router; `api_router` wires them together under
//! one tree with the auth middleware applied. The caller mounts the result
//! under `/api`.

pub mod account;
pub mod feedback;
pub mod messaging;
pub mod middleware;
pub mod notification;
pub mod pairing;
pub mod presence;
pub mod reports;
pub mod resources;
pub mod response;
pub mod session;

use std::sync::Arc;

use axum::response::Response;
use axum::{routing::get, Router};

use crate::application::handlers::session::{
    CreateSessionHandler, DeleteSessionHandler, GetSessionHandler, ListSessionsHandler,
    RegisterStudentHandler, UnregisterStudentHandler, UpdateSessionHandler,
};
use crate::ports::{
    ConversationStore, FeedbackRepository, FileStorage, NotificationStore, PairingRepository,
    ResourceStore, SessionRepository, TokenService, UserDirectory,
};

use middleware::{auth_middleware, AuthState};
use presence::PresenceTracker;

/// Everything the API needs, behind ports.
#[derive(Clone)]
pub struct ApiDeps {
    pub sessions: Arc<dyn SessionRepository>,
    pub users: Arc<dyn UserDirectory>,
    pub pairing: Arc<dyn PairingRepository>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub conversations: Arc<dyn ConversationStore>,
    pub notifications: Arc<dyn NotificationStore>,
    pub resources: Arc<dyn ResourceStore>,
    pub files: Arc<dyn FileStorage>,
    pub tokens: Arc<dyn TokenService>,
}

/// GET /api/health
async fn health() -> Response {
    response::ok("ok")
}

/// Builds the full API router (mount under `/api`).
pub fn api_router(deps: ApiDeps) -> Router {
    let session_handlers = session::SessionHandlers::new(
        Arc::new(CreateSessionHandler::new(
            deps.sessions.clone(),
            deps.users.clone(),
        )),
        Arc::new(UpdateSessionHandler::new(deps.sessions.clone())),
        Arc::new(DeleteSessionHandler::new(deps.sessions.clone())),
        Arc::new(GetSessionHandler::new(deps.sessions.clone())),
        Arc::new(ListSessionsHandler::new(deps.sessions.clone())),
        Arc::new(RegisterStudentHandler::new(deps.sessions.clone())),
        Arc::new(UnregisterStudentHandler::new(deps.sessions.clone())),
    );

    let account_handlers =
        account::AccountHandlers::new(deps.users.clone(), deps.tokens.clone());
    let pairing_handlers = pairing::PairingHandlers::new(
        deps.pairing.clone(),
        deps.users.clone(),
        deps.feedback.clone(),
        deps.notifications.clone(),
    );
    let feedback_handlers = feedback::FeedbackHandlers::new(
        deps.feedback.clone(),
        deps.sessions.clone(),
        deps.users.clone(),
    );
    let messaging_handlers =
        messaging::MessagingHandlers::new(deps.conversations.clone(), deps.users.clone());
    let notification_handlers = notification::NotificationHandlers::new(
        deps.notifications.clone(),
        deps.users.clone(),
    );
    let resource_handlers =
        resources::ResourceHandlers::new(deps.resources.clone(), deps.files.clone());
    let report_handlers = reports::ReportHandlers::new(
        deps.sessions.clone(),
        deps.users.clone(),
        deps.feedback.clone(),
    );
    let presence_tracker = Arc::new(PresenceTracker::new());

    let auth_state: AuthState = deps.tokens.clone();

    Router::new()
        .route("/health", get(health))
        .nest("/auth", account::auth_routes(account_handlers.clone()))
        .nest("/users", account::profile_routes(account_handlers.clone()))
        .nest("/admin", account::admin_routes(account_handlers))
        .nest("/sessions", session::session_routes(session_handlers))
        .nest("/feedback", feedback::feedback_routes(feedback_handlers))
        .nest("/messages", messaging::messaging_routes(messaging_handlers))
        .nest(
            "/notifications",
            notification::notification_routes(notification_handlers),
        )
        .nest("/resources", resources::resource_routes(resource_handlers))
        .nest("/reports", reports::report_routes(report_handlers))
        .nest("/presence", presence::presence_routes(presence_tracker))
        .merge(pairing::pairing_routes(pairing_handlers))
        .layer(axum::middleware::from_fn_with_state(
            auth_state,
            auth_middleware,
        ))
}
