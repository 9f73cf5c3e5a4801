//! HTTP adapter for authentication, profile, and admin user endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{ChangePasswordRequest, CreateUserRequest, LoginRequest, UpdateRoleRequest};
pub use handlers::AccountHandlers;
pub use routes::{admin_routes, auth_routes, profile_routes};
