//! HTTP routes for authentication, profile, and admin user management.

use axum::{
    routing::{get, patch, post, put},
    Router,
};

use super::handlers::{
    admin_create_user, admin_delete_user, admin_list_users, admin_update_role, admin_update_user,
    change_password, get_profile, login, logout, update_profile, AccountHandlers,
};

/// `/api/auth` routes (login is the one unauthenticated endpoint).
pub fn auth_routes(handlers: AccountHandlers) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state(handlers)
}

/// `/api/users` routes (own profile).
pub fn profile_routes(handlers: AccountHandlers) -> Router {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/password", put(change_password))
        .with_state(handlers)
}

/// `/api/admin` routes.
pub fn admin_routes(handlers: AccountHandlers) -> Router {
    Router::new()
        .route("/users", get(admin_list_users).post(admin_create_user))
        .route("/users/:id", put(admin_update_user).delete(admin_delete_user))
        .route("/users/:id/role", patch(admin_update_role))
        .with_state(handlers)
}
