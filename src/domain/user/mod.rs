//! User domain module - platform accounts.

mod account;

pub use account::{AccountStatus, UserAccount, UserPatch};
