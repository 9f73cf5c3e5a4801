//! HTTP DTOs for session endpoints.
//!
//! Wire fields are camelCase to match the frontend contract. Date and time
//! fields arrive as strings and are parsed in the handlers so malformed
//! values produce the standard envelope instead of an extractor rejection.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::SessionStatus;
use crate::domain::scheduling::{Modality, Session};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to create a new session.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    pub subject: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `HH:MM`, 24-hour.
    pub start_time: String,
    /// `HH:MM`, 24-hour.
    pub end_time: String,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub modality: Option<Modality>,
    pub link: Option<String>,
    pub max_students: Option<u32>,
}

/// Partial update: absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub subject: Option<String>,
    pub date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    #[serde(rename = "type")]
    pub modality: Option<Modality>,
    pub link: Option<String>,
    pub max_students: Option<u32>,
    pub status: Option<SessionStatus>,
}

/// Query parameters for listing sessions.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListSessionsParams {
    #[serde(default)]
    pub status: Option<SessionStatus>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Full session shape returned by every session endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: String,
    pub tutor_id: String,
    pub tutor_name: String,
    pub subject: String,
    pub date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    #[serde(rename = "type")]
    pub modality: Modality,
    pub link: Option<String>,
    pub max_students: u32,
    pub registered: u32,
    pub status: SessionStatus,
    pub students: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id().to_string(),
            tutor_id: session.tutor_id().to_string(),
            tutor_name: session.tutor_name().to_string(),
            subject: session.subject().to_string(),
            date: session.slot().date().to_string(),
            start_time: session.slot().start().to_string(),
            end_time: session.slot().end().to_string(),
            location: session.location().to_string(),
            modality: session.modality(),
            link: session.link().map(str::to_string),
            max_students: session.max_students(),
            registered: session.registered(),
            status: session.status(),
            students: session.roster().iter().map(|s| s.to_string()).collect(),
            created_at: session.created_at().to_rfc3339(),
            updated_at: session.updated_at().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{SessionId, UserId};
    use crate::domain::scheduling::TimeSlot;

    #[test]
    fn create_request_deserializes_with_defaults() {
        let json = r#"{
            "subject": "Databases",
            "date": "2026-03-14",
            "startTime": "14:00",
            "endTime": "16:00"
        }"#;
        let req: CreateSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.subject, "Databases");
        assert!(req.max_students.is_none());
        assert!(req.modality.is_none());
    }

    #[test]
    fn update_request_accepts_type_alias_for_modality() {
        let json = r#"{"type": "offline"}"#;
        let req: UpdateSessionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.modality, Some(Modality::Offline));
    }

    #[test]
    fn session_response_uses_wire_field_names() {
        let mut session = Session::new(
            SessionId::new(),
            UserId::new("t-1").unwrap(),
            "Dr. Chen".to_string(),
            "Databases".to_string(),
            TimeSlot::new(
                "2026-03-14".parse().unwrap(),
                "14:00".parse().unwrap(),
                "16:00".parse().unwrap(),
            )
            .unwrap(),
            "Online".to_string(),
            Modality::Online,
            None,
            10,
        )
        .unwrap();
        session.register(UserId::new("s-1").unwrap()).unwrap();

        let json = serde_json::to_value(SessionResponse::from(session)).unwrap();
        assert_eq!(json["tutorId"], "t-1");
        assert_eq!(json["startTime"], "14:00");
        assert_eq!(json["endTime"], "16:00");
        assert_eq!(json["type"], "online");
        assert_eq!(json["maxStudents"], 10);
        assert_eq!(json["registered"], 1);
        assert_eq!(json["students"][0], "s-1");
    }
}
