//! Response envelope shared by every endpoint.
//!
//! All responses are `{ "success": bool, "data"?: ..., "error"?: { "code",
//! "message" } }`; error codes come from the domain's `ErrorCode`
//! vocabulary so handlers never invent wire strings.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::scheduling::SchedulingError;

/// 200 envelope with data.
pub fn ok(data: impl Serialize) -> Response {
    success(StatusCode::OK, data)
}

/// 201 envelope with data.
pub fn created(data: impl Serialize) -> Response {
    success(StatusCode::CREATED, data)
}

/// Success envelope with an explicit status.
pub fn success(status: StatusCode, data: impl Serialize) -> Response {
    (status, Json(json!({ "success": true, "data": data }))).into_response()
}

/// Error envelope; the HTTP status is derived from the code.
pub fn failure(code: ErrorCode, message: impl Into<String>) -> Response {
    (
        status_for(code),
        Json(json!({
            "success": false,
            "error": { "code": code.as_str(), "message": message.into() }
        })),
    )
        .into_response()
}

/// Error envelope for a `DomainError`.
pub fn domain_failure(err: DomainError) -> Response {
    if err.code == ErrorCode::ServerError {
        tracing::error!(error = %err, "request failed");
    }
    failure(err.code, err.message)
}

/// Error envelope for the scheduling core's error type.
pub fn scheduling_failure(err: SchedulingError) -> Response {
    if let SchedulingError::Infrastructure(ref msg) = err {
        tracing::error!(error = %msg, "scheduling request failed");
    }
    failure(err.code(), err.message())
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Unauthorized | ErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::Duplicate => StatusCode::CONFLICT,
        ErrorCode::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        // Validation and scheduling conflicts are all client-correctable
        // 400s; the code field distinguishes them.
        _ => StatusCode::BAD_REQUEST,
    }
}
