// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email/password authentication routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

use super::json_body;
use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, removal_cookie, session_cookie, AuthUser};
use crate::models::{PublicUser, User};
use crate::services::{hash_password, verify_password, DUMMY_PASSWORD_HASH};
use crate::AppState;

/// Public auth routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/logout", post(logout))
}

/// Auth routes that need a session. The auth middleware is applied in routes/mod.rs.
pub fn session_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/admin", get(check_admin))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    password: String,
}

/// Response for login and registration.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AuthResponse {
    pub success: bool,
    pub user: PublicUser,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MeResponse {
    pub user: PublicUser,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AdminResponse {
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Emails are matched case-insensitively by storing them lowercased.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Match a password against the looked-up account.
///
/// An unknown email still pays for one Argon2 verification, so it cannot be
/// told apart from a wrong password by response time.
fn check_credentials(user: Option<User>, password: &str) -> Result<User> {
    let Some(user) = user else {
        verify_password(password, DUMMY_PASSWORD_HASH)?;
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password(password, &user.password_hash)? {
        tracing::info!(user_id = user.id, "Login rejected: wrong password");
        return Err(AppError::InvalidCredentials);
    }

    Ok(user)
}

/// Log in with email and password, setting the session cookie.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let body = json_body(payload)?;
    let (email, password) = match (non_blank(body.email), non_blank(body.password)) {
        (Some(email), Some(password)) => (normalize_email(&email), password),
        _ => {
            return Err(AppError::BadRequest(
                "Email and password are required".to_string(),
            ))
        }
    };

    let user = check_credentials(state.db.find_user_by_email(&email).await?, &password)?;

    if let Some(reason) = user.access_denied_reason() {
        tracing::info!(user_id = user.id, reason, "Login rejected");
        return Err(AppError::Forbidden(reason.to_string()));
    }

    state.db.record_login(user.id).await?;
    tracing::info!(user_id = user.id, "User logged in");

    let jar = start_session(&state, jar, &user)?;
    Ok((
        jar,
        Json(AuthResponse {
            success: true,
            user: PublicUser::from(&user),
        }),
    ))
}

/// Create an account and log it in.
async fn register(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>)> {
    let mut body = json_body(payload)?;
    body.email = normalize_email(&body.email);
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let password_hash = hash_password(&body.password)?;

    let user = state
        .db
        .create_user(&body.email, &password_hash)
        .await?
        .ok_or_else(|| AppError::Conflict("Email is already registered".to_string()))?;

    tracing::info!(user_id = user.id, "User registered");

    let jar = start_session(&state, jar, &user)?;
    Ok((
        StatusCode::CREATED,
        jar,
        Json(AuthResponse {
            success: true,
            user: PublicUser::from(&user),
        }),
    ))
}

fn start_session(state: &AppState, jar: CookieJar, user: &User) -> Result<CookieJar> {
    let token = create_jwt(user.id, &user.email, &state.config.jwt_signing_key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))?;
    Ok(jar.add(session_cookie(token, &state.config)))
}

/// Log out by expiring the session cookie. No session is required.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> (CookieJar, Json<LogoutResponse>) {
    (
        jar.add(removal_cookie(&state.config)),
        Json(LogoutResponse { success: true }),
    )
}

/// Current session's user.
async fn me(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<MeResponse>> {
    let user = state
        .db
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", auth.user_id)))?;

    if let Some(reason) = user.access_denied_reason() {
        return Err(AppError::Forbidden(reason.to_string()));
    }

    Ok(Json(MeResponse {
        user: PublicUser::from(&user),
    }))
}

/// Succeeds only for administrators.
async fn check_admin(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<AdminResponse>> {
    match state.db.is_admin(auth.user_id).await? {
        None => Err(AppError::NotFound(format!(
            "User {} not found",
            auth.user_id
        ))),
        Some(false) => {
            tracing::warn!(user_id = auth.user_id, email = %auth.email, "Admin check denied");
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
        Some(true) => Ok(Json(AdminResponse { is_admin: true })),
    }
}
