//! Resource domain module - shared learning materials.

mod document;

pub use document::{ResourceCategory, ResourceDoc};
