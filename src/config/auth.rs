//! Authentication configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Authentication configuration (JWT signing)
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: SecretString,

    /// Token lifetime in minutes
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u32,
}

impl AuthConfig {
    /// Token lifetime in seconds, the unit the token service wants.
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_minutes as i64 * 60
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.expose_secret().len() < 16 {
            return Err(ValidationError::JwtSecretTooShort);
        }
        if self.token_ttl_minutes == 0 {
            return Err(ValidationError::InvalidTokenTtl);
        }
        Ok(())
    }
}

fn default_token_ttl() -> u32 {
    60
}
