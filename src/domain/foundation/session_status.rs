//! SessionStatus enum for tracking the lifecycle of tutoring sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a tutoring session.
///
/// Only `Scheduled` sessions participate in conflict checks and accept
/// registrations. The terminal states are set by tutor/admin action and are
/// not validated against the session's time window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Scheduled,
    Completed,
    Cancelled,
}

impl SessionStatus {
    /// Returns true if the session is open for registration and counts
    /// toward overlap conflicts.
    pub fn is_open(&self) -> bool {
        matches!(self, SessionStatus::Scheduled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Scheduled => "scheduled",
            SessionStatus::Completed => "completed",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "scheduled" => Some(SessionStatus::Scheduled),
            "completed" => Some(SessionStatus::Completed),
            "cancelled" => Some(SessionStatus::Cancelled),
            _ => None,
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_scheduled() {
        assert_eq!(SessionStatus::default(), SessionStatus::Scheduled);
    }

    #[test]
    fn only_scheduled_is_open() {
        assert!(SessionStatus::Scheduled.is_open());
        assert!(!SessionStatus::Completed.is_open());
        assert!(!SessionStatus::Cancelled.is_open());
    }

    #[test]
    fn serializes_to_lowercase_json() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::Scheduled).unwrap(),
            "\"scheduled\""
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
    }

    #[test]
    fn deserializes_from_lowercase_json() {
        let status: SessionStatus = serde_json::from_str("\"completed\"").unwrap();
        assert_eq!(status, SessionStatus::Completed);
    }

    #[test]
    fn parse_roundtrips() {
        for status in [
            SessionStatus::Scheduled,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse("archived"), None);
    }
}
