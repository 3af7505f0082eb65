// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Email list (newsletter / waitlist) signup.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use super::json_body;
use crate::error::{AppError, Result};
use crate::AppState;

const DEFAULT_SOURCE: &str = "website";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/email-list", post(subscribe))
}

#[derive(Deserialize, Validate)]
pub struct SubscribeRequest {
    #[validate(email(message = "Invalid email address"))]
    email: String,
    #[validate(length(max = 64, message = "Source must be at most 64 characters"))]
    source: Option<String>,
}

impl SubscribeRequest {
    /// Lowercase the email; a blank source counts as no source.
    fn normalize(&mut self) {
        self.email = self.email.trim().to_lowercase();
        self.source = self
            .source
            .take()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
    }
}

#[derive(Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    /// False when the address was already on the list.
    pub subscribed: bool,
}

async fn subscribe(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SubscribeResponse>)> {
    let mut body = json_body(payload)?;
    body.normalize();
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let source = body.source.as_deref().unwrap_or(DEFAULT_SOURCE);
    let subscribed = state.db.add_to_email_list(&body.email, source).await?;

    tracing::info!(source, subscribed, "Email list signup");

    let status = if subscribed {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(SubscribeResponse {
            success: true,
            subscribed,
        }),
    ))
}
