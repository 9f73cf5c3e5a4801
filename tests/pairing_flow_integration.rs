//! Integration test for the pairing flow: request, notification, decision.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use tutorlink::adapters::auth::MockTokenService;
use tutorlink::adapters::http::{api_router, ApiDeps};
use tutorlink::adapters::memory::{
    InMemoryConversationStore, InMemoryFeedbackRepository, InMemoryNotificationStore,
    InMemoryPairingRepository, InMemoryResourceStore, InMemorySessionRepository,
    InMemoryUserDirectory,
};
use tutorlink::adapters::storage::LocalFileStorage;
use tutorlink::domain::foundation::Role;

fn test_app(upload_dir: &std::path::Path) -> Router {
    let tokens = MockTokenService::new()
        .with_test_user("student-token", "s-1", Role::Student)
        .with_test_user("tutor-token", "t-1", Role::Tutor);

    let deps = ApiDeps {
        sessions: Arc::new(InMemorySessionRepository::new()),
        users: Arc::new(InMemoryUserDirectory::with_demo_accounts()),
        pairing: Arc::new(InMemoryPairingRepository::new()),
        feedback: Arc::new(InMemoryFeedbackRepository::new()),
        conversations: Arc::new(InMemoryConversationStore::new()),
        notifications: Arc::new(InMemoryNotificationStore::new()),
        resources: Arc::new(InMemoryResourceStore::new()),
        files: Arc::new(LocalFileStorage::new(upload_dir)),
        tokens: Arc::new(tokens),
    };

    Router::new().nest("/api", api_router(deps))
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    let request = match body {
        Some(body) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            builder.body(Body::from(body.to_string())).unwrap()
        }
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn pairing_request_flows_to_acceptance_with_notifications() {
    let dir = tempfile::tempdir().unwrap();
    let app = test_app(dir.path());

    // The tutor directory lists the demo tutors.
    let (status, tutors) = call(&app, Method::GET, "/api/tutors", "student-token", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(tutors["data"]
        .as_array()
        .unwrap()
        .iter()
        .any(|t| t["id"] == "t-1"));

    // Student sends a pairing request.
    let (status, request) = call(
        &app,
        Method::POST,
        "/api/tutors/t-1/pair-request",
        "student-token",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["data"]["status"], "pending");
    let request_id = request["data"]["id"].as_str().unwrap().to_string();

    // A duplicate while pending is rejected.
    let (status, dup) = call(
        &app,
        Method::POST,
        "/api/tutors/t-1/pair-request",
        "student-token",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(dup["error"]["code"], "DUPLICATE");

    // The tutor sees the request and a notification.
    let (_, incoming) = call(
        &app,
        Method::GET,
        "/api/tutor/pair-requests",
        "tutor-token",
        None,
    )
    .await;
    assert_eq!(incoming["data"].as_array().unwrap().len(), 1);

    let (_, notes) = call(&app, Method::GET, "/api/notifications", "tutor-token", None).await;
    assert_eq!(notes["data"].as_array().unwrap().len(), 1);
    assert_eq!(notes["data"][0]["type"], "pairing");

    // A bogus action is rejected; accept works.
    let uri = format!("/api/tutor/pair-requests/{request_id}");
    let (status, body) = call(
        &app,
        Method::PUT,
        &uri,
        "tutor-token",
        Some(json!({ "action": "maybe" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_ACTION");

    let (status, accepted) = call(
        &app,
        Method::PUT,
        &uri,
        "tutor-token",
        Some(json!({ "action": "accept" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["data"]["status"], "accepted");

    // Both sides now list the accepted pair; the student was notified.
    for token in ["student-token", "tutor-token"] {
        let (_, paired) = call(&app, Method::GET, "/api/paired", token, None).await;
        assert_eq!(paired["data"].as_array().unwrap().len(), 1);
    }

    let (_, notes) = call(
        &app,
        Method::GET,
        "/api/notifications?status=unread",
        "student-token",
        None,
    )
    .await;
    assert_eq!(notes["data"].as_array().unwrap().len(), 1);

    // Mark-all-read clears the student's feed.
    let (_, after) = call(
        &app,
        Method::PATCH,
        "/api/notifications/mark-all-read",
        "student-token",
        None,
    )
    .await;
    assert!(after["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|n| n["status"] == "read"));
}
