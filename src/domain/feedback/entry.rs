//! Feedback entry and its rating rules.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, FeedbackId, SessionId, Timestamp, UserId,
};

/// Minimum length of the free-text comment, in characters.
pub const MIN_COMMENT_CHARS: usize = 10;

/// The five criteria a student scores, each 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ratings {
    pub quality: u8,
    pub knowledge: u8,
    pub communication: u8,
    pub helpfulness: u8,
    pub time_management: u8,
}

impl Ratings {
    fn values(&self) -> [u8; 5] {
        [
            self.quality,
            self.knowledge,
            self.communication,
            self.helpfulness,
            self.time_management,
        ]
    }

    /// All five criteria must be scored 1-5.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.values().iter().all(|v| (1..=5).contains(v)) {
            Ok(())
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidRatings,
                "All five criteria must be rated 1-5",
            ))
        }
    }
}

/// A student's published feedback for a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: FeedbackId,
    pub session_id: SessionId,
    pub student_id: UserId,
    /// "Anonymous" when the student opted out of attribution.
    pub student_name: String,
    pub tutor_id: UserId,
    pub tutor_name: String,
    pub subject: String,
    pub ratings: Ratings,
    pub good_points: String,
    pub improvements: String,
    pub comment: String,
    pub recommend: bool,
    pub anonymous: bool,
    pub tutor_viewed: bool,
    pub created_at: Timestamp,
}

impl FeedbackEntry {
    /// Builds a validated entry.
    ///
    /// # Errors
    ///
    /// - `INVALID_RATINGS` when any criterion falls outside 1-5
    /// - `INVALID_COMMENT` when the trimmed comment is shorter than
    ///   [`MIN_COMMENT_CHARS`]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session_id: SessionId,
        student_id: UserId,
        student_name: String,
        tutor_id: UserId,
        tutor_name: String,
        subject: String,
        ratings: Ratings,
        good_points: String,
        improvements: String,
        comment: String,
        recommend: bool,
        anonymous: bool,
    ) -> Result<Self, DomainError> {
        ratings.validate()?;
        if comment.trim().chars().count() < MIN_COMMENT_CHARS {
            return Err(DomainError::new(
                ErrorCode::InvalidComment,
                format!("Comment must be at least {} characters", MIN_COMMENT_CHARS),
            ));
        }

        let student_name = if anonymous {
            "Anonymous".to_string()
        } else {
            student_name
        };

        Ok(Self {
            id: FeedbackId::new(),
            session_id,
            student_id,
            student_name,
            tutor_id,
            tutor_name,
            subject,
            ratings,
            good_points,
            improvements,
            comment,
            recommend,
            anonymous,
            tutor_viewed: false,
            created_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratings(quality: u8) -> Ratings {
        Ratings {
            quality,
            knowledge: 4,
            communication: 5,
            helpfulness: 3,
            time_management: 4,
        }
    }

    fn entry(ratings: Ratings, comment: &str, anonymous: bool) -> Result<FeedbackEntry, DomainError> {
        FeedbackEntry::new(
            SessionId::new(),
            UserId::new("s-1").unwrap(),
            "An Nguyen".to_string(),
            UserId::new("t-1").unwrap(),
            "Dr. Chen".to_string(),
            "Databases".to_string(),
            ratings,
            String::new(),
            String::new(),
            comment.to_string(),
            true,
            anonymous,
        )
    }

    #[test]
    fn valid_entry_is_accepted() {
        let fb = entry(ratings(5), "Very clear explanations.", false).unwrap();
        assert_eq!(fb.student_name, "An Nguyen");
        assert!(!fb.tutor_viewed);
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let err = entry(ratings(0), "Very clear explanations.", false).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRatings);

        let err = entry(ratings(6), "Very clear explanations.", false).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidRatings);
    }

    #[test]
    fn short_comment_is_rejected() {
        let err = entry(ratings(4), "  ok  ", false).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidComment);
    }

    #[test]
    fn anonymous_entry_hides_the_student_name() {
        let fb = entry(ratings(4), "Good pacing and examples.", true).unwrap();
        assert_eq!(fb.student_name, "Anonymous");
        assert!(fb.anonymous);
    }
}
