//! HTTP middleware for axum.
//!
//! - `auth` - Authentication middleware, extractors, and the role gate

pub mod auth;

pub use auth::{auth_middleware, ensure_role, AuthRejection, AuthState, RequireAuth};
