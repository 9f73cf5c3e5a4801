//! HTTP handlers for authentication, profile, and admin user management.

use std::sync::Arc;

use axum::response::Response;
use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::json;

use crate::adapters::auth::{hash_password, verify_password};
use crate::adapters::http::middleware::{ensure_role, RequireAuth};
use crate::adapters::http::response::{created, domain_failure, failure, ok};
use crate::domain::foundation::{AuthenticatedUser, ErrorCode, Role, Timestamp, UserId};
use crate::domain::notification::NotificationSettings;
use crate::domain::user::{AccountStatus, UserAccount, UserPatch};
use crate::ports::{TokenService, UserDirectory};

use super::dto::{ChangePasswordRequest, CreateUserRequest, LoginRequest, UpdateRoleRequest};

#[derive(Clone)]
pub struct AccountHandlers {
    users: Arc<dyn UserDirectory>,
    tokens: Arc<dyn TokenService>,
}

impl AccountHandlers {
    pub fn new(users: Arc<dyn UserDirectory>, tokens: Arc<dyn TokenService>) -> Self {
        Self { users, tokens }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Authentication
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/auth/login
pub async fn login(
    State(handlers): State<AccountHandlers>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let (username, password) = match (req.username, req.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            return failure(
                ErrorCode::InvalidInput,
                "Please provide a username and password",
            )
        }
    };

    let account = match handlers.users.find_by_username(&username).await {
        Ok(Some(account)) => account,
        Ok(None) => {
            return failure(ErrorCode::InvalidCredentials, "Wrong username or password")
        }
        Err(e) => return domain_failure(e),
    };

    if !verify_password(&password, &account.password_hash) {
        return failure(ErrorCode::InvalidCredentials, "Wrong username or password");
    }

    let user = AuthenticatedUser::new(
        account.id.clone(),
        account.role,
        Some(account.name.clone()),
    );
    let token = match handlers.tokens.issue(&user) {
        Ok(token) => token,
        Err(_) => return failure(ErrorCode::ServerError, "Failed to issue token"),
    };

    ok(json!({ "token": token, "user": account }))
}

/// POST /api/auth/logout
pub async fn logout() -> Response {
    // Tokens are stateless; logout is a client-side discard.
    ok(json!({ "message": "Logged out" }))
}

// ════════════════════════════════════════════════════════════════════════════
// Profile
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/users/profile
pub async fn get_profile(
    State(handlers): State<AccountHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers.users.find_by_id(&user.id).await {
        Ok(Some(account)) => ok(account),
        Ok(None) => failure(ErrorCode::NotFound, "User not found"),
        Err(e) => domain_failure(e),
    }
}

/// PUT /api/users/profile
pub async fn update_profile(
    State(handlers): State<AccountHandlers>,
    RequireAuth(user): RequireAuth,
    Json(patch): Json<UserPatch>,
) -> Response {
    match handlers.users.update(&user.id, patch.self_service()).await {
        Ok(account) => ok(account),
        Err(e) => domain_failure(e),
    }
}

/// PUT /api/users/password
pub async fn change_password(
    State(handlers): State<AccountHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<ChangePasswordRequest>,
) -> Response {
    let account = match handlers.users.find_by_id(&user.id).await {
        Ok(Some(account)) => account,
        Ok(None) => return failure(ErrorCode::NotFound, "User not found"),
        Err(e) => return domain_failure(e),
    };

    if !verify_password(&req.current_password, &account.password_hash) {
        return failure(ErrorCode::InvalidPassword, "Current password is incorrect");
    }

    match handlers
        .users
        .update_password(&user.id, &hash_password(&req.new_password))
        .await
    {
        Ok(()) => ok(json!({ "message": "Password updated" })),
        Err(e) => domain_failure(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Admin user management
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/admin/users
pub async fn admin_list_users(
    State(handlers): State<AccountHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Admin]) {
        return resp;
    }
    match handlers.users.list().await {
        Ok(accounts) => ok(accounts),
        Err(e) => domain_failure(e),
    }
}

/// POST /api/admin/users
pub async fn admin_create_user(
    State(handlers): State<AccountHandlers>,
    RequireAuth(user): RequireAuth,
    Json(req): Json<CreateUserRequest>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Admin]) {
        return resp;
    }

    let (username, password, role) = match (req.username, req.password, req.role) {
        (Some(u), Some(p), Some(r)) if !u.is_empty() && !p.is_empty() => (u, p, r),
        _ => return failure(ErrorCode::InvalidInput, "Missing required fields"),
    };

    let id = match UserId::new(uuid::Uuid::new_v4().to_string()) {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::ServerError, "Failed to allocate user id"),
    };
    let account = UserAccount {
        id,
        name: req.name.clone().unwrap_or_else(|| username.clone()),
        email: req
            .email
            .unwrap_or_else(|| format!("{}@tutorlink.example.edu", username)),
        student_no: req.student_no.or_else(|| Some(username.clone())),
        username,
        password_hash: hash_password(&password),
        role,
        phone: String::new(),
        department: String::new(),
        major: String::new(),
        avatar: "/avatars/default.png".to_string(),
        skills: Vec::new(),
        settings: NotificationSettings::default(),
        status: AccountStatus::Active,
        created_at: Timestamp::now(),
    };

    match handlers.users.create(account).await {
        Ok(account) => created(account),
        Err(e) => domain_failure(e),
    }
}

/// PUT /api/admin/users/:id
pub async fn admin_update_user(
    State(handlers): State<AccountHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(patch): Json<UserPatch>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Admin]) {
        return resp;
    }
    let id = match UserId::new(id) {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "User not found"),
    };
    // Role changes go through the dedicated endpoint.
    let patch = UserPatch { role: None, ..patch };

    match handlers.users.update(&id, patch).await {
        Ok(account) => ok(account),
        Err(e) => domain_failure(e),
    }
}

/// DELETE /api/admin/users/:id
pub async fn admin_delete_user(
    State(handlers): State<AccountHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Admin]) {
        return resp;
    }
    let id = match UserId::new(id) {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "User not found"),
    };

    match handlers.users.delete(&id).await {
        Ok(()) => ok(json!({ "message": "User deleted" })),
        Err(e) => domain_failure(e),
    }
}

/// PATCH /api/admin/users/:id/role
pub async fn admin_update_role(
    State(handlers): State<AccountHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> Response {
    if let Err(resp) = ensure_role(&user, &[Role::Admin]) {
        return resp;
    }
    let id = match UserId::new(id) {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "User not found"),
    };

    let patch = UserPatch {
        role: Some(req.role),
        ..Default::default()
    };
    match handlers.users.update(&id, patch).await {
        Ok(account) => ok(account),
        Err(e) => domain_failure(e),
    }
}
