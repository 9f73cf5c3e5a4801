//! Scheduling-specific error types.

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};

/// Errors produced by the scheduling core.
///
/// Each variant maps to exactly one envelope error code, so HTTP adapters
/// never have to invent codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    /// Session was not found.
    NotFound(SessionId),
    /// The session date lies in the past.
    InvalidTime,
    /// The time window is shorter than the minimum duration (or inverted).
    InvalidDuration,
    /// The slot overlaps another scheduled session.
    Conflict(String),
    /// The session is no longer open for registration.
    NotAvailable,
    /// The session has reached its capacity.
    Full,
    /// The caller may not manage this session.
    Forbidden,
    /// A field failed validation.
    Validation { field: String, message: String },
    /// Infrastructure error (storage, serialization).
    Infrastructure(String),
}

impl SchedulingError {
    pub fn conflict(message: impl Into<String>) -> Self {
        SchedulingError::Conflict(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        SchedulingError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        SchedulingError::Infrastructure(message.into())
    }

    /// Envelope error code for this failure.
    pub fn code(&self) -> ErrorCode {
        match self {
            SchedulingError::NotFound(_) => ErrorCode::NotFound,
            SchedulingError::InvalidTime => ErrorCode::InvalidTime,
            SchedulingError::InvalidDuration => ErrorCode::InvalidDuration,
            SchedulingError::Conflict(_) => ErrorCode::Conflict,
            SchedulingError::NotAvailable => ErrorCode::NotAvailable,
            SchedulingError::Full => ErrorCode::Full,
            SchedulingError::Forbidden => ErrorCode::Forbidden,
            SchedulingError::Validation { .. } => ErrorCode::InvalidInput,
            SchedulingError::Infrastructure(_) => ErrorCode::ServerError,
        }
    }

    /// Human-readable message for the envelope.
    pub fn message(&self) -> String {
        match self {
            SchedulingError::NotFound(id) => format!("Session not found: {}", id),
            SchedulingError::InvalidTime => "Cannot schedule a session in the past".to_string(),
            SchedulingError::InvalidDuration => {
                format!(
                    "Sessions must run at least {} minutes",
                    super::MIN_SESSION_MINUTES
                )
            }
            SchedulingError::Conflict(msg) => msg.clone(),
            SchedulingError::NotAvailable => {
                "Session is no longer open for registration".to_string()
            }
            SchedulingError::Full => "Session is full".to_string(),
            SchedulingError::Forbidden => "You may not manage this session".to_string(),
            SchedulingError::Validation { field, message } => {
                format!("Invalid '{}': {}", field, message)
            }
            SchedulingError::Infrastructure(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for SchedulingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for SchedulingError {}

impl From<DomainError> for SchedulingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::NotFound => SchedulingError::Infrastructure(err.message),
            ErrorCode::Forbidden => SchedulingError::Forbidden,
            _ => SchedulingError::Infrastructure(err.to_string()),
        }
    }
}
