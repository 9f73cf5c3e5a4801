//! Session aggregate entity.
//!
//! A session is one tutoring slot owned by a single tutor and attended by
//! up to `max_students` registered students.
//!
//! # Invariants
//!
//! - `registered()` always equals the roster length (the count is derived,
//!   never stored separately).
//! - The roster contains no duplicates and never exceeds `max_students`.
//! - The time slot satisfies the minimum-duration rule (enforced by
//!   [`TimeSlot`]).
//!
//! Cross-session invariants (tutor overlap, student overlap) need sight of
//! the other sessions and are enforced at the repository boundary.

use serde::{Deserialize, Serialize};

use super::{ClockTime, SchedulingError, SessionDate, TimeSlot};
use crate::domain::foundation::{Role, SessionId, SessionStatus, Timestamp, UserId};

/// Capacity used when a create request does not specify one.
pub const DEFAULT_MAX_STUDENTS: u32 = 10;

/// How a session is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    #[default]
    Online,
    Offline,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Online => "online",
            Modality::Offline => "offline",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "online" => Some(Modality::Online),
            "offline" => Some(Modality::Offline),
            _ => None,
        }
    }
}

/// Outcome of a registration attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// The student was appended to the roster.
    Added,
    /// The student was already on the roster; nothing changed.
    AlreadyRegistered,
}

/// Session aggregate - one tutoring slot with a capacity-bounded roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    id: SessionId,

    /// Tutor who owns this session.
    tutor_id: UserId,

    /// Denormalized tutor display name for listings.
    tutor_name: String,

    /// Subject label.
    subject: String,

    /// Date and time window.
    slot: TimeSlot,

    /// Location string (room, campus, or "Online").
    location: String,

    /// Online or offline delivery.
    modality: Modality,

    /// Optional meeting link for online sessions.
    link: Option<String>,

    /// Maximum number of registered students.
    max_students: u32,

    /// Lifecycle status.
    status: SessionStatus,

    /// Registered student ids; order carries no meaning, uniqueness does.
    roster: Vec<UserId>,

    /// When the session was created.
    created_at: Timestamp,

    /// When the session was last modified.
    updated_at: Timestamp,
}

impl Session {
    /// Creates a new scheduled session with an empty roster.
    ///
    /// The slot's duration rule is enforced by [`TimeSlot::new`]; this
    /// constructor validates the remaining fields.
    ///
    /// # Errors
    ///
    /// - `Validation` if the subject is blank or the capacity is zero
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: SessionId,
        tutor_id: UserId,
        tutor_name: String,
        subject: String,
        slot: TimeSlot,
        location: String,
        modality: Modality,
        link: Option<String>,
        max_students: u32,
    ) -> Result<Self, SchedulingError> {
        if subject.trim().is_empty() {
            return Err(SchedulingError::validation("subject", "cannot be empty"));
        }
        if max_students == 0 {
            return Err(SchedulingError::validation(
                "maxStudents",
                "must be at least 1",
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id,
            tutor_id,
            tutor_name,
            subject,
            slot,
            location,
            modality,
            link,
            max_students,
            status: SessionStatus::Scheduled,
            roster: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Reconstitutes a session from persistence (no validation).
    #[allow(clippy::too_many_arguments)]
    pub fn reconstitute(
        id: SessionId,
        tutor_id: UserId,
        tutor_name: String,
        subject: String,
        slot: TimeSlot,
        location: String,
        modality: Modality,
        link: Option<String>,
        max_students: u32,
        status: SessionStatus,
        roster: Vec<UserId>,
        created_at: Timestamp,
        updated_at: Timestamp,
    ) -> Self {
        Self {
            id,
            tutor_id,
            tutor_name,
            subject,
            slot,
            location,
            modality,
            link,
            max_students,
            status,
            roster,
            created_at,
            updated_at,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn tutor_id(&self) -> &UserId {
        &self.tutor_id
    }

    pub fn tutor_name(&self) -> &str {
        &self.tutor_name
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn slot(&self) -> &TimeSlot {
        &self.slot
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn link(&self) -> Option<&str> {
        self.link.as_deref()
    }

    pub fn max_students(&self) -> u32 {
        self.max_students
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn roster(&self) -> &[UserId] {
        &self.roster
    }

    /// Derived registered count; always `roster().len()`.
    pub fn registered(&self) -> u32 {
        self.roster.len() as u32
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    /// True if the given student is on the roster.
    pub fn has_student(&self, student: &UserId) -> bool {
        self.roster.contains(student)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Authorization
    // ─────────────────────────────────────────────────────────────────────────

    /// Validates that the caller may modify or delete this session.
    ///
    /// Tutors manage only their own sessions; admins manage any.
    ///
    /// # Errors
    ///
    /// - `Forbidden` for a tutor that does not own the session
    pub fn authorize_manage(&self, caller: &UserId, role: Role) -> Result<(), SchedulingError> {
        if role == Role::Admin || &self.tutor_id == caller {
            Ok(())
        } else {
            Err(SchedulingError::Forbidden)
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Registers a student onto the roster.
    ///
    /// Already-registered students short-circuit to an idempotent success
    /// before the capacity test, so re-registration is always safe. The
    /// cross-session student conflict check happens at the repository,
    /// which can see the student's other registrations.
    ///
    /// # Errors
    ///
    /// - `NotAvailable` if the session is not `scheduled`
    /// - `Full` if a new student would exceed the capacity
    pub fn register(&mut self, student: UserId) -> Result<RegistrationOutcome, SchedulingError> {
        if !self.status.is_open() {
            return Err(SchedulingError::NotAvailable);
        }
        if self.has_student(&student) {
            return Ok(RegistrationOutcome::AlreadyRegistered);
        }
        if self.registered() >= self.max_students {
            return Err(SchedulingError::Full);
        }

        self.roster.push(student);
        self.updated_at = Timestamp::now();
        Ok(RegistrationOutcome::Added)
    }

    /// Removes a student from the roster.
    ///
    /// Unconditional: no status or capacity checks, and removing an absent
    /// student is a successful no-op. Returns whether anything changed.
    pub fn unregister(&mut self, student: &UserId) -> bool {
        let before = self.roster.len();
        self.roster.retain(|s| s != student);
        let removed = self.roster.len() != before;
        if removed {
            self.updated_at = Timestamp::now();
        }
        removed
    }

    /// Applies a partial update, touching only the supplied fields.
    ///
    /// The effective time window (patched values overlaid on current ones)
    /// is re-validated as a whole, so changing only `endTime` still runs
    /// the duration rule against the existing start.
    ///
    /// # Errors
    ///
    /// - `InvalidDuration` if the effective window is too short
    /// - `Full` if the new capacity falls below the current roster size
    pub fn apply(&mut self, patch: SessionPatch) -> Result<(), SchedulingError> {
        // Validate everything before the first mutation so a failed patch
        // leaves the aggregate untouched.
        let slot = patch.resolve_slot(&self.slot)?;
        if let Some(ref subject) = patch.subject {
            if subject.trim().is_empty() {
                return Err(SchedulingError::validation("subject", "cannot be empty"));
            }
        }
        if let Some(max) = patch.max_students {
            if max == 0 {
                return Err(SchedulingError::validation(
                    "maxStudents",
                    "must be at least 1",
                ));
            }
            if max < self.registered() {
                return Err(SchedulingError::Full);
            }
        }

        self.slot = slot;
        if let Some(max) = patch.max_students {
            self.max_students = max;
        }
        if let Some(subject) = patch.subject {
            self.subject = subject;
        }
        if let Some(location) = patch.location {
            self.location = location;
        }
        if let Some(modality) = patch.modality {
            self.modality = modality;
        }
        if let Some(link) = patch.link {
            // An empty string clears the link.
            self.link = if link.is_empty() { None } else { Some(link) };
        }
        if let Some(status) = patch.status {
            self.status = status;
        }

        self.updated_at = Timestamp::now();
        Ok(())
    }
}

/// Partial update for a session: one optional per mutable attribute,
/// applied only where present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionPatch {
    pub subject: Option<String>,
    pub date: Option<SessionDate>,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub location: Option<String>,
    pub modality: Option<Modality>,
    pub link: Option<String>,
    pub max_students: Option<u32>,
    pub status: Option<SessionStatus>,
}

impl SessionPatch {
    /// True if the patch changes the date or time window.
    pub fn touches_slot(&self) -> bool {
        self.date.is_some() || self.start_time.is_some() || self.end_time.is_some()
    }

    /// Overlays the patched date/time fields on the current slot and
    /// re-validates the result.
    ///
    /// # Errors
    ///
    /// - `InvalidDuration` if the effective window violates the minimum
    pub fn resolve_slot(&self, current: &TimeSlot) -> Result<TimeSlot, SchedulingError> {
        TimeSlot::new(
            self.date.unwrap_or_else(|| current.date()),
            self.start_time.unwrap_or_else(|| current.start()),
            self.end_time.unwrap_or_else(|| current.end()),
        )
    }
}
