// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::response::Response;
use polytrade_api::config::Config;
use polytrade_api::db::PgDb;
use polytrade_api::middleware::auth::create_jwt;
use polytrade_api::routes::create_router;
use polytrade_api::services::WsServiceClient;
use polytrade_api::AppState;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Check if a test database is available via environment variable.
#[allow(dead_code)]
pub fn database_available() -> bool {
    std::env::var("DATABASE_URL").is_ok()
}

/// Skip test with message if no database is configured.
#[macro_export]
macro_rules! require_database {
    () => {
        if !crate::common::database_available() {
            eprintln!("⚠️  Skipping: DATABASE_URL not set");
            return;
        }
    };
}

/// Connect to the test database and apply the reference schema.
#[allow(dead_code)]
pub async fn test_db() -> (PgDb, sqlx::PgPool) {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to apply migrations");
    (PgDb::from_pool(pool.clone()), pool)
}

/// Number of `email_list` rows carrying the given address.
#[allow(dead_code)]
pub async fn email_list_count(pool: &sqlx::PgPool, email: &str) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM email_list WHERE email = $1")
        .bind(email)
        .fetch_one(pool)
        .await
        .expect("Failed to count email_list rows")
}

/// Build a router around the given database and WS service location.
#[allow(dead_code)]
pub fn create_app(db: PgDb, config: Config) -> (axum::Router, Arc<AppState>) {
    let ws_service = WsServiceClient::new(
        &config.ws_service_url,
        Duration::from_secs(config.ws_service_timeout_secs),
    )
    .expect("Failed to build WS service client");

    let state = Arc::new(AppState {
        config,
        db,
        ws_service,
    });

    (create_router(state.clone()), state)
}

/// Create a test app with offline mock dependencies.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_app(PgDb::new_mock(), Config::test_default())
}

/// Test app whose WS service client points at `ws_url` with a 1 second timeout.
#[allow(dead_code)]
pub fn create_test_app_with_ws(ws_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.ws_service_url = ws_url.to_string();
    config.ws_service_timeout_secs = 1;
    create_app(PgDb::new_mock(), config)
}

#[allow(dead_code)]
pub fn create_test_app_with_frontend_url(frontend_url: &str) -> (axum::Router, Arc<AppState>) {
    let mut config = Config::test_default();
    config.frontend_url = frontend_url.to_string();
    create_app(PgDb::new_mock(), config)
}

/// Create a session token the way the login route does.
#[allow(dead_code)]
pub fn create_test_jwt(user_id: i32, signing_key: &[u8]) -> String {
    create_jwt(user_id, "trader@example.com", signing_key).expect("Failed to create JWT")
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).expect("Response body is not JSON")
}

/// Email address unique to this test run.
#[allow(dead_code)]
pub fn unique_email(prefix: &str) -> String {
    static COUNTER: AtomicU32 = AtomicU32::new(0);
    let n = COUNTER.fetch_add(1, Ordering::Relaxed);
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{prefix}-{nanos}-{n}@example.com")
}
