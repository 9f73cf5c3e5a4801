//! Authentication adapters.
//!
//! Implementations of the `TokenService` port plus password hashing:
//!
//! - `jwt` - HS256 tokens for production
//! - `mock` - Fixed-token validator for tests
//! - `password` - SHA-256 digests with constant-time comparison

mod jwt;
mod mock;
mod password;

pub use jwt::JwtTokenService;
pub use mock::MockTokenService;
pub use password::{hash_password, verify_password};
