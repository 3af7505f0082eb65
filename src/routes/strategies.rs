// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Trading strategy routes, proxied to the WS service.
//!
//! Requests are scoped to the session's user: the WS service receives the
//! `userId` from the verified token, never from the client.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::json_body;
use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::services::UpstreamResponse;
use crate::AppState;

const STRATEGIES_PATH: &str = "/api/strategies";
const MAX_STRATEGY_ID_LEN: usize = 64;

/// Strategy routes (require authentication via JWT).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/strategies", get(list_strategies).post(create_strategy))
        .route(
            "/api/strategies/{id}",
            get(get_strategy).delete(delete_strategy),
        )
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UserScope {
    user_id: i32,
}

impl From<&AuthUser> for UserScope {
    fn from(user: &AuthUser) -> Self {
        Self {
            user_id: user.user_id,
        }
    }
}

/// Strategy ids are forwarded into an upstream path, so only a safe charset is allowed.
fn validate_strategy_id(id: &str) -> Result<()> {
    let valid = !id.is_empty()
        && id.len() <= MAX_STRATEGY_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(())
    } else {
        Err(AppError::BadRequest("Invalid strategy id".to_string()))
    }
}

async fn list_strategies(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<UpstreamResponse> {
    state
        .ws_service
        .get(STRATEGIES_PATH, &UserScope::from(&user))
        .await
}

/// Create a strategy. The body is passed through with `userId` set from the session.
async fn create_strategy(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<UpstreamResponse> {
    let mut body = json_body(payload)?;
    let fields = body
        .as_object_mut()
        .ok_or_else(|| AppError::BadRequest("Strategy must be a JSON object".to_string()))?;
    fields.insert("userId".to_string(), Value::from(user.user_id));

    tracing::info!(user_id = user.user_id, "Creating strategy");

    state.ws_service.post(STRATEGIES_PATH, &body).await
}

async fn get_strategy(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<UpstreamResponse> {
    validate_strategy_id(&id)?;
    state
        .ws_service
        .get(&format!("{STRATEGIES_PATH}/{id}"), &UserScope::from(&user))
        .await
}

async fn delete_strategy(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<UpstreamResponse> {
    validate_strategy_id(&id)?;

    tracing::info!(user_id = user.user_id, strategy_id = %id, "Deleting strategy");

    state
        .ws_service
        .delete(&format!("{STRATEGIES_PATH}/{id}"), &UserScope::from(&user))
        .await
}
