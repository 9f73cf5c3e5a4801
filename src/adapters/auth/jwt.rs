//! JWT implementation of the TokenService port.
//!
//! HS256 tokens with the identity claims the platform uses (subject id,
//! role, display name). The signing key is held behind `secrecy` so it
//! never shows up in debug output.

use async_trait::async_trait;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, Role, Timestamp, UserId};
use crate::ports::TokenService;

/// Claims carried in a TutorLink token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User id.
    sub: String,
    /// Role, lowercase wire form.
    role: String,
    /// Display name, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    /// Expiry, unix seconds.
    exp: i64,
    /// Issued-at, unix seconds.
    iat: i64,
}

/// HS256 token service.
pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl JwtTokenService {
    /// Creates a service signing with `secret`, issuing tokens valid for
    /// `ttl_secs` seconds.
    pub fn new(secret: &SecretString, ttl_secs: i64) -> Self {
        let secret = secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs,
        }
    }
}

#[async_trait]
impl TokenService for JwtTokenService {
    fn issue(&self, user: &AuthenticatedUser) -> Result<String, AuthError> {
        let now = Timestamp::now();
        let claims = Claims {
            sub: user.id.to_string(),
            role: user.role.as_str().to_string(),
            name: user.display_name.clone(),
            exp: now.plus_secs(self.ttl_secs).as_datetime().timestamp(),
            iat: now.as_datetime().timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::InvalidToken)
    }

    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            }
        })?;

        let claims = data.claims;
        let id = UserId::new(claims.sub).map_err(|_| AuthError::InvalidToken)?;
        let role = Role::parse(&claims.role).ok_or(AuthError::InvalidToken)?;
        Ok(AuthenticatedUser::new(id, role, claims.name))
    }
}
