//! Scheduling domain module - the core of the platform.
//!
//! Covers calendar slots, the overlap predicate, and the `Session`
//! aggregate with its capacity-bounded roster.
//!
//! # Invariants
//!
//! - A session's registered count always equals its roster size.
//! - The roster never exceeds the session's capacity.
//! - A session runs at least [`MIN_SESSION_MINUTES`] within a single day.
//! - Two `scheduled` sessions of one tutor never overlap; a student never
//!   holds overlapping `scheduled` registrations. Enforced at the
//!   repository boundary using [`TimeSlot::overlaps`].

mod errors;
mod session;
mod time;

pub use errors::SchedulingError;
pub use session::{Modality, RegistrationOutcome, Session, SessionPatch, DEFAULT_MAX_STUDENTS};
pub use time::{ClockTime, SessionDate, TimeSlot, MIN_SESSION_MINUTES};
