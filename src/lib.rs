// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PolyTrade API: authentication and WS-service proxy routes
//!
//! This crate provides the HTTP API behind the PolyTrade trading terminal.
//! It authenticates users against PostgreSQL with signed session cookies and
//! forwards market-data and strategy requests to the WS service.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::PgDb;
use services::WsServiceClient;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: PgDb,
    pub ws_service: WsServiceClient,
}
