//! HTTP handlers for admin reporting.
//!
//! Serves only metrics computable from live data.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use serde_json::json;

use crate::adapters::http::middleware::{ensure_role, RequireAuth};
use crate::adapters::http::response::{domain_failure, ok};
use crate::domain::foundation::{DomainError, Role};
use crate::ports::{FeedbackRepository, SessionRepository, UserDirectory};

#[derive(Clone)]
pub struct ReportHandlers {
    sessions: Arc<dyn SessionRepository>,
    users: Arc<dyn UserDirectory>,
    feedback: Arc<dyn FeedbackRepository>,
}

impl ReportHandlers {
    pub fn new(
        sessions: Arc<dyn SessionRepository>,
        users: Arc<dyn UserDirectory>,
        feedback: Arc<dyn FeedbackRepository>,
    ) -> Self {
        Self {
            sessions,
            users,
            feedback,
        }
    }
}

/// GET /api/reports/overview (admin)
pub async fn overview(
    State(handlers): State<ReportHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Admin]) {
        return resp;
    }

    // Independent queries; fan them out.
    let sessions = handlers.sessions.list(None);
    let accounts = handlers.users.list();
    let feedback = handlers.feedback.list_all();
    let (sessions, accounts, feedback) = match futures::try_join!(
        async { sessions.await.map_err(|e| DomainError::server(e.message())) },
        accounts,
        feedback,
    ) {
        Ok(results) => results,
        Err(e) => return domain_failure(e),
    };

    let total_tutors = accounts.iter().filter(|a| a.role == Role::Tutor).count();
    let total_students = accounts.iter().filter(|a| a.role == Role::Student).count();

    let avg_rating = if feedback.is_empty() {
        0.0
    } else {
        let sum: u32 = feedback.iter().map(|f| f.ratings.quality as u32).sum();
        (sum as f64 / feedback.len() as f64 * 100.0).round() / 100.0
    };

    // Sessions per calendar date, most recent 14 dates.
    let mut per_date: BTreeMap<String, u32> = BTreeMap::new();
    for session in &sessions {
        *per_date.entry(session.slot().date().to_string()).or_insert(0) += 1;
    }
    let trend: Vec<_> = per_date
        .into_iter()
        .rev()
        .take(14)
        .map(|(date, count)| json!({ "date": date, "sessions": count }))
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    ok(json!({
        "totalSessions": sessions.len(),
        "totalTutors": total_tutors,
        "totalStudents": total_students,
        "avgRating": avg_rating,
        "trendData": trend,
    }))
}

/// GET /api/reports/feedback-summary (admin)
pub async fn feedback_summary(
    State(handlers): State<ReportHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Admin]) {
        return resp;
    }

    let feedback = match handlers.feedback.list_all().await {
        Ok(feedback) => feedback,
        Err(e) => return domain_failure(e),
    };

    let avg = if feedback.is_empty() {
        0.0
    } else {
        let sum: u32 = feedback.iter().map(|f| f.ratings.quality as u32).sum();
        sum as f64 / feedback.len() as f64
    };
    let dist: Vec<_> = (1..=5u8)
        .map(|rating| {
            json!({
                "rating": rating,
                "count": feedback.iter().filter(|f| f.ratings.quality == rating).count(),
            })
        })
        .collect();

    ok(json!({
        "avgSatisfaction": avg,
        "totalFeedback": feedback.len(),
        "ratingsDist": dist,
    }))
}
