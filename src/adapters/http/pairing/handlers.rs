//! HTTP handlers for pairing endpoints.

use std::sync::Arc;

use axum::response::Response;
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::adapters::http::middleware::{ensure_role, RequireAuth};
use crate::adapters::http::response::{created, domain_failure, failure, ok};
use crate::domain::foundation::{ErrorCode, PairRequestId, Role, UserId};
use crate::domain::notification::{Notification, NotificationKind};
use crate::domain::pairing::{PairAction, PairRequest, PairStatus};
use crate::ports::{FeedbackRepository, NotificationStore, PairingRepository, UserDirectory};

#[derive(Clone)]
pub struct PairingHandlers {
    pairing: Arc<dyn PairingRepository>,
    users: Arc<dyn UserDirectory>,
    feedback: Arc<dyn FeedbackRepository>,
    notifications: Arc<dyn NotificationStore>,
}

impl PairingHandlers {
    pub fn new(
        pairing: Arc<dyn PairingRepository>,
        users: Arc<dyn UserDirectory>,
        feedback: Arc<dyn FeedbackRepository>,
        notifications: Arc<dyn NotificationStore>,
    ) -> Self {
        Self {
            pairing,
            users,
            feedback,
            notifications,
        }
    }
}

/// Directory entry for the tutor list.
#[derive(Debug, Serialize)]
pub struct TutorEntry {
    pub id: String,
    pub name: String,
    pub dept: String,
    pub skills: Vec<String>,
    /// Average feedback quality; absent until the tutor has feedback.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
}

/// GET /api/tutors
pub async fn list_tutors(
    State(handlers): State<PairingHandlers>,
    RequireAuth(_user): RequireAuth,
) -> Response {
    let tutors = match handlers.users.list_tutors().await {
        Ok(tutors) => tutors,
        Err(e) => return domain_failure(e),
    };

    let mut entries = Vec::with_capacity(tutors.len());
    for tutor in tutors {
        let rating = match handlers.feedback.list_by_tutor(&tutor.id).await {
            Ok(items) if !items.is_empty() => {
                let sum: u32 = items.iter().map(|f| f.ratings.quality as u32).sum();
                Some((sum as f64 / items.len() as f64 * 100.0).round() / 100.0)
            }
            Ok(_) => None,
            Err(e) => return domain_failure(e),
        };
        entries.push(TutorEntry {
            id: tutor.id.to_string(),
            name: tutor.name,
            dept: tutor.department,
            skills: tutor.skills,
            rating,
        });
    }

    ok(entries)
}

/// POST /api/tutors/:id/pair-request (student)
pub async fn send_pair_request(
    State(handlers): State<PairingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(tutor_id): Path<String>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Student]) {
        return resp;
    }
    let tutor_id = match UserId::new(tutor_id) {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "Tutor not found"),
    };

    let tutor = match handlers.users.find_by_id(&tutor_id).await {
        Ok(Some(account)) if account.role == Role::Tutor => account,
        Ok(_) => return failure(ErrorCode::NotFound, "Tutor not found"),
        Err(e) => return domain_failure(e),
    };

    let request = PairRequest::new(
        user.id.clone(),
        user.display_name_or_id().to_string(),
        tutor.id.clone(),
        tutor.name.clone(),
    );

    let request = match handlers.pairing.insert(request).await {
        Ok(request) => request,
        Err(e) => return domain_failure(e),
    };

    let note = Notification::new(
        tutor.id,
        NotificationKind::Pairing,
        "New pairing request",
        format!("{} wants to pair with you", request.student_name),
    );
    if let Err(e) = handlers.notifications.push(note).await {
        return domain_failure(e);
    }

    created(request)
}

/// GET /api/tutor/pair-requests (tutor)
pub async fn tutor_requests(
    State(handlers): State<PairingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Tutor]) {
        return resp;
    }
    match handlers.pairing.list_for_tutor(&user.id).await {
        Ok(items) => ok(items),
        Err(e) => domain_failure(e),
    }
}

#[derive(Debug, Deserialize)]
pub struct PairActionRequest {
    pub action: Option<String>,
}

/// PUT /api/tutor/pair-requests/:id (tutor)
pub async fn resolve_request(
    State(handlers): State<PairingHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<PairActionRequest>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Tutor]) {
        return resp;
    }
    let id = match id.parse::<PairRequestId>() {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "Pair request not found"),
    };

    let action = match req.action.as_deref() {
        Some("accept") => PairAction::Accept,
        Some("reject") => PairAction::Reject,
        _ => return failure(ErrorCode::InvalidAction, "Action must be accept or reject"),
    };

    let mut request = match handlers.pairing.find_for_tutor(&id, &user.id).await {
        Ok(Some(request)) => request,
        Ok(None) => return failure(ErrorCode::NotFound, "Pair request not found"),
        Err(e) => return domain_failure(e),
    };

    request.resolve(action);
    let request = match handlers.pairing.save(request).await {
        Ok(request) => request,
        Err(e) => return domain_failure(e),
    };

    let accepted = request.status == PairStatus::Accepted;
    let note = Notification::new(
        request.student_id.clone(),
        NotificationKind::Pairing,
        if accepted {
            "Pairing request accepted"
        } else {
            "Pairing request rejected"
        },
        format!(
            "{} has {} your pairing request",
            request.tutor_name,
            if accepted { "accepted" } else { "rejected" }
        ),
    );
    if let Err(e) = handlers.notifications.push(note).await {
        return domain_failure(e);
    }

    ok(request)
}

/// GET /api/paired (student or tutor)
pub async fn paired(
    State(handlers): State<PairingHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Student, Role::Tutor]) {
        return resp;
    }
    match handlers
        .pairing
        .list_for_user_with_status(&user.id, PairStatus::Accepted)
        .await
    {
        Ok(items) => ok(items),
        Err(e) => domain_failure(e),
    }
}
