//! HTTP handlers for session endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum::response::Response;

use crate::adapters::http::middleware::{ensure_role, RequireAuth};
use crate::adapters::http::response::{created, failure, ok, scheduling_failure};
use crate::application::handlers::session::{
    CreateSessionCommand, CreateSessionHandler, DeleteSessionCommand, DeleteSessionHandler,
    GetSessionHandler, GetSessionQuery, ListSessionsHandler, ListSessionsQuery,
    RegisterStudentCommand, RegisterStudentHandler, UnregisterStudentCommand,
    UnregisterStudentHandler, UpdateSessionCommand, UpdateSessionHandler,
};
use crate::domain::foundation::{ErrorCode, Role, SessionId};
use crate::domain::scheduling::{ClockTime, SessionDate, SessionPatch};

use super::dto::{
    CreateSessionRequest, ListSessionsParams, SessionResponse, UpdateSessionRequest,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct SessionHandlers {
    create_handler: Arc<CreateSessionHandler>,
    update_handler: Arc<UpdateSessionHandler>,
    delete_handler: Arc<DeleteSessionHandler>,
    get_handler: Arc<GetSessionHandler>,
    list_handler: Arc<ListSessionsHandler>,
    register_handler: Arc<RegisterStudentHandler>,
    unregister_handler: Arc<UnregisterStudentHandler>,
}

impl SessionHandlers {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        create_handler: Arc<CreateSessionHandler>,
        update_handler: Arc<UpdateSessionHandler>,
        delete_handler: Arc<DeleteSessionHandler>,
        get_handler: Arc<GetSessionHandler>,
        list_handler: Arc<ListSessionsHandler>,
        register_handler: Arc<RegisterStudentHandler>,
        unregister_handler: Arc<UnregisterStudentHandler>,
    ) -> Self {
        Self {
            create_handler,
            update_handler,
            delete_handler,
            get_handler,
            list_handler,
            register_handler,
            unregister_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/sessions - list, optional ?status= filter
pub async fn list_sessions(
    State(handlers): State<SessionHandlers>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<ListSessionsParams>,
) -> Response {
    match handlers
        .list_handler
        .handle(ListSessionsQuery {
            status: params.status,
        })
        .await
    {
        Ok(sessions) => ok(sessions
            .into_iter()
            .map(SessionResponse::from)
            .collect::<Vec<_>>()),
        Err(e) => scheduling_failure(e),
    }
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(_user): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match handlers.get_handler.handle(GetSessionQuery { session_id }).await {
        Ok(session) => ok(SessionResponse::from(session)),
        Err(e) => scheduling_failure(e),
    }
}

/// POST /api/sessions (tutor/admin)
pub async fn create_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateSessionRequest>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Tutor, Role::Admin]) {
        return resp;
    }

    let (date, start_time, end_time) =
        match parse_times(&req.date, &req.start_time, &req.end_time) {
            Ok(parsed) => parsed,
            Err(resp) => return resp,
        };

    let cmd = CreateSessionCommand {
        tutor_id: user.id,
        subject: req.subject,
        date,
        start_time,
        end_time,
        location: req.location,
        modality: req.modality,
        link: req.link,
        max_students: req.max_students,
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(session) => created(SessionResponse::from(session)),
        Err(e) => scheduling_failure(e),
    }
}

/// PUT /api/sessions/:id (tutor/admin)
pub async fn update_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
    Json(req): Json<UpdateSessionRequest>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Tutor, Role::Admin]) {
        return resp;
    }
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };
    let patch = match patch_from(req) {
        Ok(patch) => patch,
        Err(resp) => return resp,
    };

    let cmd = UpdateSessionCommand {
        session_id,
        caller: user.id,
        caller_role: user.role,
        patch,
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(session) => ok(SessionResponse::from(session)),
        Err(e) => scheduling_failure(e),
    }
}

/// DELETE /api/sessions/:id (tutor/admin)
pub async fn delete_session(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Tutor, Role::Admin]) {
        return resp;
    }
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = DeleteSessionCommand {
        session_id,
        caller: user.id,
        caller_role: user.role,
    };

    match handlers.delete_handler.handle(cmd).await {
        Ok(()) => ok(serde_json::json!({ "message": "Session deleted" })),
        Err(e) => scheduling_failure(e),
    }
}

/// POST /api/sessions/:id/register (student)
pub async fn register_student(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Student]) {
        return resp;
    }
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = RegisterStudentCommand {
        session_id,
        student: user.id,
    };

    match handlers.register_handler.handle(cmd).await {
        Ok(session) => ok(SessionResponse::from(session)),
        Err(e) => scheduling_failure(e),
    }
}

/// DELETE /api/sessions/:id/unregister (student)
pub async fn unregister_student(
    State(handlers): State<SessionHandlers>,
    RequireAuth(user): RequireAuth,
    Path(session_id): Path<String>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Student]) {
        return resp;
    }
    let session_id = match parse_session_id(&session_id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    let cmd = UnregisterStudentCommand {
        session_id,
        student: user.id,
    };

    match handlers.unregister_handler.handle(cmd).await {
        Ok(session) => ok(SessionResponse::from(session)),
        Err(e) => scheduling_failure(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Parsing helpers
// ════════════════════════════════════════════════════════════════════════════

fn parse_session_id(raw: &str) -> Result<SessionId, Response> {
    raw.parse::<SessionId>()
        .map_err(|_| failure(ErrorCode::NotFound, "Session not found"))
}

fn parse_times(
    date: &str,
    start: &str,
    end: &str,
) -> Result<(SessionDate, ClockTime, ClockTime), Response> {
    let date: SessionDate = date
        .parse()
        .map_err(|_| failure(ErrorCode::InvalidInput, "Invalid date, expected YYYY-MM-DD"))?;
    let start: ClockTime = start
        .parse()
        .map_err(|_| failure(ErrorCode::InvalidInput, "Invalid startTime, expected HH:MM"))?;
    let end: ClockTime = end
        .parse()
        .map_err(|_| failure(ErrorCode::InvalidInput, "Invalid endTime, expected HH:MM"))?;
    Ok((date, start, end))
}

fn patch_from(req: UpdateSessionRequest) -> Result<SessionPatch, Response> {
    let parse_date = |raw: &str| -> Result<SessionDate, Response> {
        raw.parse()
            .map_err(|_| failure(ErrorCode::InvalidInput, "Invalid date, expected YYYY-MM-DD"))
    };
    let parse_time = |raw: &str, field: &str| -> Result<ClockTime, Response> {
        raw.parse().map_err(|_| {
            failure(
                ErrorCode::InvalidInput,
                format!("Invalid {field}, expected HH:MM"),
            )
        })
    };

    Ok(SessionPatch {
        subject: req.subject,
        date: req.date.as_deref().map(parse_date).transpose()?,
        start_time: req
            .start_time
            .as_deref()
            .map(|raw| parse_time(raw, "startTime"))
            .transpose()?,
        end_time: req
            .end_time
            .as_deref()
            .map(|raw| parse_time(raw, "endTime"))
            .transpose()?,
        location: req.location,
        modality: req.modality,
        link: req.link,
        max_students: req.max_students,
        status: req.status,
    })
}
