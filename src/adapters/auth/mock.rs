//! Mock token service for testing.
//!
//! Maps fixed token strings to users, avoiding real JWT handling in tests.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, UserId};
use crate::ports::TokenService;

/// Mock token service: tokens not registered return `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockTokenService {
    tokens: RwLock<HashMap<String, AuthenticatedUser>>,
}

impl MockTokenService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a token that maps to a user.
    pub fn with_user(self, token: impl Into<String>, user: AuthenticatedUser) -> Self {
        self.tokens.write().unwrap().insert(token.into(), user);
        self
    }

    /// Registers a token for a simple test user with the given role.
    pub fn with_test_user(self, token: impl Into<String>, user_id: &str, role: Role) -> Self {
        let user = AuthenticatedUser::new(
            UserId::new(user_id).unwrap(),
            role,
            Some(format!("Test User {}", user_id)),
        );
        self.with_user(token, user)
    }
}

#[async_trait]
impl TokenService for MockTokenService {
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
        let token = format!("mock-token-{}", user.id);
        self.tokens
            .write()
            .unwrap()
            .insert(token.clone(), user.clone());
        Ok(token)
    }

    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
