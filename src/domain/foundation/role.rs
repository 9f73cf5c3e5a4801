//! User roles and the access they imply.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of an account on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// A student: registers into sessions, sends pair requests, leaves feedback.
    Student,
    /// A tutor: owns sessions, answers pair requests, shares resources.
    Tutor,
    /// An administrator: full management access.
    Admin,
}

impl Role {
    /// Returns true if this role may create and manage tutoring sessions.
    pub fn manages_sessions(&self) -> bool {
        matches!(self, Role::Tutor | Role::Admin)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Tutor => "tutor",
            Role::Admin => "admin",
        }
    }

    /// Parses a role from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "student" => Some(Role::Student),
            "tutor" => Some(Role::Tutor),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
