//! Authentication middleware and extractors for axum.
//!
//! - `auth_middleware` - validates Bearer tokens and injects the user into
//!   request extensions
//! - `RequireAuth` - extractor that requires authentication
//! - `ensure_role` - per-route role gate used inside handlers
//!
//! The middleware only sees the `TokenService` port, so swapping real JWTs
//! for the test mock changes nothing here.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, AuthenticatedUser, ErrorCode, Role};
use crate::ports::TokenService;

use super::super::response::failure;

/// Auth middleware state - the token validator.
pub type AuthState = Arc<dyn TokenService>;

/// Validates the `Authorization: Bearer <token>` header.
///
/// On success the `AuthenticatedUser` lands in request extensions; with no
/// header the request continues unauthenticated (handlers enforce
/// `RequireAuth` where needed); an invalid token is rejected here.
pub async fn auth_middleware(
    State(tokens): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match tokens.validate(token).await {
            Ok(user) => {
                request.extensions_mut().insert(user);
                next.run(request).await
            }
            Err(e) => {
                let message = match &e {
                    AuthError::TokenExpired => "Session expired",
                    _ => "Invalid token",
                };
                failure(ErrorCode::Unauthorized, message)
            }
        },
        None => next.run(request).await,
    }
}

/// Extractor that requires an authenticated caller.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub AuthenticatedUser);

impl<S> axum::extract::FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<AuthenticatedUser>()
                .cloned()
                .map(RequireAuth)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Role gate used at the top of role-restricted handlers.
///
/// Returns the ready-made 403 envelope as `Err` so handlers can
/// `if let Err(resp) = ensure_role(...) { return resp; }`.
pub fn ensure_role(user: &AuthenticatedUser, allowed: &[Role]) -> Result<(), Response> {
    user.require_role(allowed)
        .map_err(|_| failure(ErrorCode::Forbidden, "You do not have access to this resource"))
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "success": false,
                "error": { "code": "UNAUTHORIZED", "message": "Missing token" }
            })),
        )
            .into_response()
    }
}
