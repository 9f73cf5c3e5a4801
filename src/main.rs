//! TutorLink server binary.
//!
//! Loads configuration, connects PostgreSQL for sessions and users, wires
//! the in-process stores for the collaborator modules, and serves the API
//! under `/api`.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use tutorlink::adapters::auth::JwtTokenService;
use tutorlink::adapters::http::{api_router, ApiDeps};
use tutorlink::adapters::memory::{
    InMemoryConversationStore, InMemoryFeedbackRepository, InMemoryNotificationStore,
    InMemoryPairingRepository, InMemoryResourceStore,
};
use tutorlink::adapters::postgres::{PostgresSessionRepository, PostgresUserDirectory};
use tutorlink::adapters::storage::LocalFileStorage;
use tutorlink::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        "starting tutorlink"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("migrations applied");
    }

    let deps = ApiDeps {
        sessions: Arc::new(PostgresSessionRepository::new(pool.clone())),
        users: Arc::new(PostgresUserDirectory::new(pool.clone())),
        pairing: Arc::new(InMemoryPairingRepository::new()),
        feedback: Arc::new(InMemoryFeedbackRepository::new()),
        conversations: Arc::new(InMemoryConversationStore::new()),
        notifications: Arc::new(InMemoryNotificationStore::new()),
        resources: Arc::new(InMemoryResourceStore::new()),
        files: Arc::new(LocalFileStorage::new(config.storage.resource_dir.clone())),
        tokens: Arc::new(JwtTokenService::new(
            &config.auth.jwt_secret,
            config.auth.token_ttl_secs(),
        )),
    };

    let cors = if config.server.cors_origins_list().is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .server
            .cors_origins_list()
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let app = Router::new()
        .nest("/api", api_router(deps))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors)
        .layer(CompressionLayer::new());

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
