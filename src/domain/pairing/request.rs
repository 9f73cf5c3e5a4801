//! Pairing request entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{PairRequestId, Timestamp, UserId};

/// Status of a pairing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Action a tutor takes on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PairAction {
    Accept,
    Reject,
}

/// A student's request to be paired with a tutor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PairRequest {
    pub id: PairRequestId,
    pub student_id: UserId,
    pub student_name: String,
    pub tutor_id: UserId,
    pub tutor_name: String,
    pub status: PairStatus,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl PairRequest {
    /// Creates a new pending request.
    pub fn new(
        student_id: UserId,
        student_name: String,
        tutor_id: UserId,
        tutor_name: String,
    ) -> Self {
        Self {
            id: PairRequestId::new(),
            student_id,
            student_name,
            tutor_id,
            tutor_name,
            status: PairStatus::Pending,
            created_at: Timestamp::now(),
            updated_at: None,
        }
    }

    /// Applies the tutor's decision.
    pub fn resolve(&mut self, action: PairAction) {
        self.status = match action {
            PairAction::Accept => PairStatus::Accepted,
            PairAction::Reject => PairStatus::Rejected,
        };
        self.updated_at = Some(Timestamp::now());
    }

    pub fn is_pending(&self) -> bool {
        self.status == PairStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PairRequest {
        PairRequest::new(
            UserId::new("s-1").unwrap(),
            "An Nguyen".to_string(),
            UserId::new("t-1").unwrap(),
            "Dr. Chen".to_string(),
        )
    }

    #[test]
    fn new_request_is_pending() {
        assert!(request().is_pending());
    }

    #[test]
    fn accept_resolves_to_accepted() {
        let mut pr = request();
        pr.resolve(PairAction::Accept);
        assert_eq!(pr.status, PairStatus::Accepted);
        assert!(pr.updated_at.is_some());
    }

    #[test]
    fn reject_resolves_to_rejected() {
        let mut pr = request();
        pr.resolve(PairAction::Reject);
        assert_eq!(pr.status, PairStatus::Rejected);
    }

    #[test]
    fn action_deserializes_from_lowercase() {
        let action: PairAction = serde_json::from_str("\"accept\"").unwrap();
        assert_eq!(action, PairAction::Accept);
        assert!(serde_json::from_str::<PairAction>("\"maybe\"").is_err());
    }
}
