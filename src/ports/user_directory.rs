//! User directory port - account lookup and management.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::user::{UserAccount, UserPatch};
use async_trait::async_trait;

/// Port for account storage and lookup.
///
/// Backed by the relational `users` table in production and by a seeded
/// in-memory directory in tests and demo mode.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Finds an account by id. Returns `None` if absent.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserAccount>, DomainError>;

    /// Finds an account by login username. Returns `None` if absent.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserAccount>, DomainError>;

    /// All accounts, admin listing order (newest first).
    async fn list(&self) -> Result<Vec<UserAccount>, DomainError>;

    /// Active accounts matching `query` against name/username/email,
    /// excluding `exclude`, capped at `limit`. An empty query matches all.
    async fn search(
        &self,
        query: &str,
        exclude: &UserId,
        limit: usize,
    ) -> Result<Vec<UserAccount>, DomainError>;

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// - `DUPLICATE` if the username is taken
    async fn create(&self, account: UserAccount) -> Result<UserAccount, DomainError>;

    /// Applies a partial update and returns the new state.
    ///
    /// # Errors
    ///
    /// - `NOT_FOUND` if the account doesn't exist
    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<UserAccount, DomainError>;

    /// Replaces the stored password digest.
    async fn update_password(&self, id: &UserId, password_hash: &str) -> Result<(), DomainError>;

    /// Deletes an account.
    ///
    /// # Errors
    ///
    /// - `NOT_FOUND` if the account doesn't exist
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;

    /// Accounts with the tutor role (pairing directory).
    async fn list_tutors(&self) -> Result<Vec<UserAccount>, DomainError>;
}
