//! HTTP handlers for feedback endpoints.

use std::sync::Arc;

use axum::response::Response;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::adapters::http::middleware::{ensure_role, RequireAuth};
use crate::adapters::http::response::{created, domain_failure, failure, ok, scheduling_failure};
use crate::domain::feedback::{FeedbackEntry, Ratings};
use crate::domain::foundation::{ErrorCode, FeedbackId, Role, SessionId};
use crate::ports::{FeedbackRepository, SessionRepository, UserDirectory};

#[derive(Clone)]
pub struct FeedbackHandlers {
    feedback: Arc<dyn FeedbackRepository>,
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserDirectory>,
}

impl FeedbackHandlers {
    pub fn new(
        feedback: Arc<dyn FeedbackRepository>,
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            feedback,
            sessions,
            users,
        }
    }
}

/// GET /api/feedback/sessions/completed (student)
pub async fn completed_sessions(
    State(handlers): State<FeedbackHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Student]) {
        return resp;
    }
    match handlers.sessions.list_completed_for_student(&user.id).await {
        Ok(sessions) => ok(sessions
            .into_iter()
            .map(crate::adapters::http::session::SessionResponse::from)
            .collect::<Vec<_>>()),
        Err(e) => scheduling_failure(e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitFeedbackRequest {
    pub session_id: String,
    pub ratings: Option<Ratings>,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub good_points: String,
    #[serde(default)]
    pub improvements: String,
    #[serde(default)]
    pub recommend: bool,
    #[serde(default)]
    pub anonymous: bool,
}

/// POST /api/feedback (student)
pub async fn submit_feedback(
    State(handlers): State<FeedbackHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<SubmitFeedbackRequest>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Student]) {
        return resp;
    }

    let invalid_session =
        || failure(ErrorCode::InvalidSession, "Only completed sessions you attended can be rated");

    let session_id = match req.session_id.parse::<SessionId>() {
        Ok(id) => id,
        Err(_) => return invalid_session(),
    };
    let session = match handlers.sessions.find_by_id(&session_id).await {
        Ok(Some(session)) => session,
        Ok(None) => return invalid_session(),
        Err(e) => return scheduling_failure(e),
    };
    if session.status() != crate::domain::foundation::SessionStatus::Completed
        || !session.has_student(&user.id)
    {
        return invalid_session();
    }

    let ratings = match req.ratings {
        Some(ratings) => ratings,
        None => {
            return failure(ErrorCode::InvalidRatings, "All five criteria must be rated 1-5")
        }
    };

    let student_name = match handlers.users.find_by_id(&user.id).await {
        Ok(Some(account)) => account.name,
        Ok(None) => user.display_name_or_id().to_string(),
        Err(e) => return domain_failure(e),
    };

    let entry = match FeedbackEntry::new(
        session_id,
        user.id,
        student_name,
        session.tutor_id().clone(),
        session.tutor_name().to_string(),
        session.subject().to_string(),
        ratings,
        req.good_points,
        req.improvements,
        req.comment,
        req.recommend,
        req.anonymous,
    ) {
        Ok(entry) => entry,
        Err(e) => return domain_failure(e),
    };

    match handlers.feedback.insert(entry).await {
        Ok(entry) => created(entry),
        Err(e) => domain_failure(e),
    }
}

/// GET /api/feedback/my-history (student)
pub async fn my_history(
    State(handlers): State<FeedbackHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Student]) {
        return resp;
    }
    match handlers.feedback.list_by_student(&user.id).await {
        Ok(items) => ok(items),
        Err(e) => domain_failure(e),
    }
}

/// GET /api/feedback/tutor (tutor) - entries plus summary stats
pub async fn tutor_feedback(
    State(handlers): State<FeedbackHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Tutor]) {
        return resp;
    }
    let items = match handlers.feedback.list_by_tutor(&user.id).await {
        Ok(items) => items,
        Err(e) => return domain_failure(e),
    };

    let avg_quality = if items.is_empty() {
        0.0
    } else {
        let sum: u32 = items.iter().map(|f| f.ratings.quality as u32).sum();
        (sum as f64 / items.len() as f64 * 100.0).round() / 100.0
    };

    ok(json!({
        "items": items,
        "stats": { "total": items.len(), "avgQuality": avg_quality }
    }))
}

/// PATCH /api/feedback/tutor/:id/mark-viewed (tutor)
pub async fn mark_viewed(
    State(handlers): State<FeedbackHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Tutor]) {
        return resp;
    }
    let id = match id.parse::<FeedbackId>() {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "Feedback not found"),
    };
    match handlers.feedback.mark_viewed(&id, &user.id).await {
        Ok(entry) => ok(entry),
        Err(e) => domain_failure(e),
    }
}

/// GET /api/feedback/admin (admin)
pub async fn admin_list(
    State(handlers): State<FeedbackHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Admin]) {
        return resp;
    }
    match handlers.feedback.list_all().await {
        Ok(items) => ok(items),
        Err(e) => domain_failure(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryFeedbackRepository, InMemorySessionRepository, InMemoryUserDirectory,
    };
    use crate::domain::foundation::{AuthenticatedUser, SessionStatus, UserId};
    use crate::domain::scheduling::{Modality, Session, SessionPatch, TimeSlot};
    use axum::http::StatusCode;

    fn student_user() -> AuthenticatedUser {
        AuthenticatedUser::new(
            UserId::new("s-1").unwrap(),
            Role::Student,
            Some("An Nguyen".to_string()),
        )
    }

    async fn completed_session(repo: &InMemorySessionRepository, with_student: bool) -> Session {
        let mut session = Session::new(
            crate::domain::foundation::SessionId::new(),
            UserId::new("t-1").unwrap(),
            "Dr. Chen".to_string(),
            "Databases".to_string(),
            TimeSlot::new(
                "2026-03-14".parse().unwrap(),
                "09:00".parse().unwrap(),
                "10:00".parse().unwrap(),
            )
            .unwrap(),
            "Online".to_string(),
            Modality::Online,
            None,
            5,
        )
        .unwrap();
        if with_student {
            session.register(UserId::new("s-1").unwrap()).unwrap();
        }
        session
            .apply(SessionPatch {
                status: Some(SessionStatus::Completed),
                ..Default::default()
            })
            .unwrap();
        repo.create(session.clone()).await.unwrap();
        session
    }

    fn good_ratings() -> Ratings {
        Ratings {
            quality: 5,
            knowledge: 4,
            communication: 5,
            helpfulness: 4,
            time_management: 5,
        }
    }

    fn request(session: &Session, ratings: Option<Ratings>, comment: &str) -> SubmitFeedbackRequest {
        SubmitFeedbackRequest {
            session_id: session.id().to_string(),
            ratings,
            comment: comment.to_string(),
            good_points: String::new(),
            improvements: String::new(),
            recommend: true,
            anonymous: false,
        }
    }

    fn handlers(sessions: Arc<InMemorySessionRepository>) -> FeedbackHandlers {
        FeedbackHandlers::new(
            Arc::new(InMemoryFeedbackRepository::new()),
            sessions,
            Arc::new(InMemoryUserDirectory::with_demo_accounts()),
        )
    }

    #[tokio::test]
    async fn feedback_for_attended_completed_session_is_created() {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let session = completed_session(&sessions, true).await;

        let response = submit_feedback(
            State(handlers(sessions)),
            RequireAuth(student_user()),
            Json(request(&session, Some(good_ratings()), "Clear and patient teaching.")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn feedback_for_unattended_session_is_invalid() {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let session = completed_session(&sessions, false).await;

        let response = submit_feedback(
            State(handlers(sessions)),
            RequireAuth(student_user()),
            Json(request(&session, Some(good_ratings()), "Clear and patient teaching.")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn short_comment_is_rejected() {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let session = completed_session(&sessions, true).await;

        let response = submit_feedback(
            State(handlers(sessions)),
            RequireAuth(student_user()),
            Json(request(&session, Some(good_ratings()), "ok")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_ratings_are_rejected() {
        let sessions = Arc::new(InMemorySessionRepository::new());
        let session = completed_session(&sessions, true).await;

        let response = submit_feedback(
            State(handlers(sessions)),
            RequireAuth(student_user()),
            Json(request(&session, None, "Clear and patient teaching.")),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
