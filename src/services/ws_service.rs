// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP client for the WS service (market data and strategies).
//!
//! Requests are forwarded as JSON with a fixed per-request timeout.
//! Success responses are passed through unchanged; failures map to:
//! - upstream non-2xx: same status, upstream error message
//! - timeout: 504
//! - connection failure or unreadable body: 502

use crate::error::AppError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Response relayed from the WS service.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    /// `None` when the upstream sent no body (e.g. 204 No Content).
    pub body: Option<Value>,
}

impl IntoResponse for UpstreamResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

/// WS service client.
#[derive(Clone)]
pub struct WsServiceClient {
    http: reqwest::Client,
    base_url: String,
}

impl WsServiceClient {
    /// Create a client for the service at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET `path` with query parameters.
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<UpstreamResponse, AppError> {
        self.send(self.http.get(self.url(path)).query(query), path)
            .await
    }

    /// POST a JSON body to `path`.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<UpstreamResponse, AppError> {
        self.send(self.http.post(self.url(path)).json(body), path)
            .await
    }

    /// DELETE `path` with query parameters.
    pub async fn delete<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<UpstreamResponse, AppError> {
        self.send(self.http.delete(self.url(path)).query(query), path)
            .await
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> Result<UpstreamResponse, AppError> {
        let response = request
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(transport_error)?;

        tracing::debug!(path, status = status.as_u16(), "WS service responded");

        if !status.is_success() {
            let message = error_message(&bytes, status);
            tracing::warn!(path, status = status.as_u16(), error = %message, "WS service error");
            return Err(AppError::Upstream { status, message });
        }

        let body = if bytes.is_empty() {
            None
        } else {
            Some(serde_json::from_slice(&bytes).map_err(|e| {
                AppError::UpstreamUnavailable(format!("Invalid JSON from {}: {}", path, e))
            })?)
        };

        Ok(UpstreamResponse { status, body })
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::UpstreamTimeout
    } else {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

/// Pull a human-readable message out of an upstream error body.
fn error_message(bytes: &[u8], status: StatusCode) -> String {
    let from_json = serde_json::from_slice::<Value>(bytes).ok().and_then(|v| {
        ["error", "message"]
            .iter()
            .find_map(|key| v.get(*key).and_then(Value::as_str).map(str::to_string))
    });

    from_json
        .or_else(|| {
            let text = String::from_utf8_lossy(bytes).trim().to_string();
            (!text.is_empty()).then_some(text)
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Upstream error")
                .to_string()
        })
}
