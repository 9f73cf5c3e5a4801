//! Pairing domain module - student/tutor pairing requests.

mod request;

pub use request::{PairAction, PairRequest, PairStatus};
