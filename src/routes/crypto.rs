// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Market data routes, proxied to the WS service.

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::services::UpstreamResponse;
use crate::AppState;

const DEFAULT_INTERVAL: &str = "1h";
const DEFAULT_LIMIT: u32 = 100;
const MAX_LIMIT: u32 = 1000;
const MAX_SYMBOL_LEN: usize = 32;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/crypto/candles", get(get_candles))
}

#[derive(Deserialize)]
pub struct CandlesQuery {
    symbol: Option<String>,
    interval: Option<String>,
    limit: Option<u32>,
}

/// Query forwarded to the WS service, with defaults filled in.
#[derive(Debug, Serialize, PartialEq)]
struct UpstreamCandlesQuery {
    symbol: String,
    interval: String,
    limit: u32,
}

impl TryFrom<CandlesQuery> for UpstreamCandlesQuery {
    type Error = AppError;

    fn try_from(query: CandlesQuery) -> Result<Self> {
        let symbol = query
            .symbol
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::BadRequest("Missing 'symbol' parameter".to_string()))?;

        if symbol.len() > MAX_SYMBOL_LEN {
            return Err(AppError::BadRequest(
                "Invalid 'symbol' parameter: too long".to_string(),
            ));
        }

        let limit = query.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::BadRequest(format!(
                "Invalid 'limit' parameter: must be between 1 and {}",
                MAX_LIMIT
            )));
        }

        Ok(Self {
            symbol,
            interval: query
                .interval
                .map(|i| i.trim().to_string())
                .filter(|i| !i.is_empty())
                .unwrap_or_else(|| DEFAULT_INTERVAL.to_string()),
            limit,
        })
    }
}

/// OHLC candles for a symbol.
async fn get_candles(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<CandlesQuery>, QueryRejection>,
) -> Result<UpstreamResponse> {
    let Query(query) = query.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let upstream_query = UpstreamCandlesQuery::try_from(query)?;

    state
        .ws_service
        .get("/api/crypto/candles", &upstream_query)
        .await
}
