//! HTTP handlers for notification endpoints.

use std::sync::Arc;

use axum::response::Response;
use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::response::{domain_failure, failure, ok};
use crate::domain::foundation::{ErrorCode, NotificationId};
use crate::domain::notification::{NotificationKind, NotificationSettings, NotificationStatus};
use crate::domain::user::UserPatch;
use crate::ports::{NotificationStore, UserDirectory};

#[derive(Clone)]
pub struct NotificationHandlers {
    notifications: Arc<dyn NotificationStore>,
    users: Arc<dyn UserDirectory>,
}

impl NotificationHandlers {
    pub fn new(notifications: Arc<dyn NotificationStore>, users: Arc<dyn UserDirectory>) -> Self {
        Self {
            notifications,
            users,
        }
    }
}

#[derive(Debug, Default, serde::Deserialize)]
pub struct ListNotificationsParams {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/notifications?status=&type=
pub async fn list_notifications(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<ListNotificationsParams>,
) -> Response {
    let status = match params.status.as_deref() {
        None => None,
        Some("unread") => Some(NotificationStatus::Unread),
        Some("read") => Some(NotificationStatus::Read),
        Some(_) => return failure(ErrorCode::InvalidInput, "Unknown status filter"),
    };
    let kind = match params.kind.as_deref() {
        None => None,
        Some("session") => Some(NotificationKind::Session),
        Some("pairing") => Some(NotificationKind::Pairing),
        Some("feedback") => Some(NotificationKind::Feedback),
        Some("progress") => Some(NotificationKind::Progress),
        Some(_) => return failure(ErrorCode::InvalidInput, "Unknown type filter"),
    };

    match handlers.notifications.list(&user.id, status, kind).await {
        Ok(items) => ok(items),
        Err(e) => domain_failure(e),
    }
}

/// PATCH /api/notifications/:id/read
pub async fn mark_read(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(user): RequireAuth,
    Path(id): Path<String>,
) -> Response {
    let id = match id.parse::<NotificationId>() {
        Ok(id) => id,
        Err(_) => return failure(ErrorCode::NotFound, "Notification not found"),
    };
    match handlers.notifications.mark_read(&id, &user.id).await {
        Ok(notification) => ok(notification),
        Err(e) => domain_failure(e),
    }
}

/// PATCH /api/notifications/mark-all-read
pub async fn mark_all_read(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers.notifications.mark_all_read(&user.id).await {
        Ok(items) => ok(items),
        Err(e) => domain_failure(e),
    }
}

/// GET /api/notifications/settings/me
pub async fn get_settings(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(user): RequireAuth,
) -> Response {
    match handlers.users.find_by_id(&user.id).await {
        Ok(Some(account)) => ok(account.settings),
        Ok(None) => ok(NotificationSettings::default()),
        Err(e) => domain_failure(e),
    }
}

/// PUT /api/notifications/settings/me
pub async fn update_settings(
    State(handlers): State<NotificationHandlers>,
    RequireAuth(user): RequireAuth,
    Json(settings): Json<NotificationSettings>,
) -> Response {
    let patch = UserPatch {
        settings: Some(settings),
        ..Default::default()
    };
    match handlers.users.update(&user.id, patch).await {
        Ok(account) => ok(account.settings),
        Err(e) => domain_failure(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryNotificationStore, InMemoryUserDirectory};
    use crate::domain::foundation::{AuthenticatedUser, Role, UserId};
    use axum::http::StatusCode;

    fn handlers() -> NotificationHandlers {
        NotificationHandlers::new(
            Arc::new(InMemoryNotificationStore::new()),
            Arc::new(InMemoryUserDirectory::with_demo_accounts()),
        )
    }

    fn caller() -> AuthenticatedUser {
        AuthenticatedUser::new(UserId::new("s-1").unwrap(), Role::Student, None)
    }

    #[tokio::test]
    async fn unknown_status_filter_is_rejected() {
        let response = list_notifications(
            State(handlers()),
            RequireAuth(caller()),
            Query(ListNotificationsParams {
                status: Some("archived".to_string()),
                kind: None,
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn settings_round_trip_through_the_directory() {
        let h = handlers();
        let mut settings = NotificationSettings::default();
        settings.pairing.sms = true;

        let response =
            update_settings(State(h.clone()), RequireAuth(caller()), Json(settings)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let account = h
            .users
            .find_by_id(&UserId::new("s-1").unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(account.settings.pairing.sms);
    }
}
