//! Token service port - issuing and validating bearer tokens.

use crate::domain::foundation::{AuthError, AuthenticatedUser};
use async_trait::async_trait;

/// Port for bearer token handling.
///
/// The HTTP middleware only sees this trait; whether tokens are HS256 JWTs
/// or fixed test strings is an adapter concern.
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Issues a token carrying the user's identity claims.
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError>;

    /// Validates a token and reconstructs the caller.
    ///
    /// # Errors
    ///
    /// - `TokenExpired` for a token past its expiry
    /// - `InvalidToken` for anything else that fails verification
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}
