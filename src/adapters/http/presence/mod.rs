//! HTTP adapter for presence tracking.
//!
//! Clients ping while active; anyone seen within the last minute counts as
//! online. In-process map, consistent with the polling model.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Response;
use axum::{
    routing::{get, post},
    Router,
};
use serde_json::json;
use tokio::sync::RwLock;

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::response::ok;
use crate::domain::foundation::{Timestamp, UserId};

/// Seconds since the last ping within which a user counts as online.
pub const ONLINE_WINDOW_SECS: i64 = 60;

/// Last-ping tracker.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    last_seen: RwLock<HashMap<UserId, Timestamp>>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a heartbeat for the user.
    pub async fn ping(&self, user: UserId) {
        self.last_seen.write().await.insert(user, Timestamp::now());
    }

    /// Users seen within the online window, sorted for stable output.
    pub async fn online(&self) -> Vec<UserId> {
        let now = Timestamp::now();
        let mut online: Vec<UserId> = self
            .last_seen
            .read()
            .await
            .iter()
            .filter(|(_, seen)| now.secs_since(seen) <= ONLINE_WINDOW_SECS)
            .map(|(user, _)| user.clone())
            .collect();
        online.sort();
        online
    }
}

/// POST /api/presence/ping
async fn ping(
    State(tracker): State<Arc<PresenceTracker>>,
    RequireAuth(user): RequireAuth,
) -> Response {
    tracker.ping(user.id).await;
    ok(json!({ "ok": true }))
}

/// GET /api/presence/online
async fn online(
    State(tracker): State<Arc<PresenceTracker>>,
    RequireAuth(_user): RequireAuth,
) -> Response {
    ok(tracker.online().await)
}

pub fn presence_routes(tracker: Arc<PresenceTracker>) -> Router {
    Router::new()
        .route("/ping", post(ping))
        .route("/online", get(online))
        .with_state(tracker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pinged_user_is_online() {
        let tracker = PresenceTracker::new();
        tracker.ping(UserId::new("u-1").unwrap()).await;

        let online = tracker.online().await;
        assert_eq!(online.len(), 1);
        assert_eq!(online[0].as_str(), "u-1");
    }

    #[tokio::test]
    async fn stale_heartbeats_drop_out() {
        let tracker = PresenceTracker::new();
        tracker
            .last_seen
            .write()
            .await
            .insert(
                UserId::new("u-1").unwrap(),
                Timestamp::now().plus_secs(-(ONLINE_WINDOW_SECS + 5)),
            );

        assert!(tracker.online().await.is_empty());
    }
}
