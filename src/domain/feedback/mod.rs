//! Feedback domain module - post-session ratings from students.

mod entry;

pub use entry::{FeedbackEntry, Ratings, MIN_COMMENT_CHARS};
