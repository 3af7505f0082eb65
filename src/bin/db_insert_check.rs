// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Manual check that the configured database role may INSERT into `email_list`.
//!
//! Reads `DATABASE_URL` (a `.env` file is honored), writes a probe row inside
//! a transaction and rolls it back. Exits non-zero if the insert is refused.

use polytrade_api::db::PgDb;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    dotenvy::dotenv().ok();

    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        tracing::error!("DATABASE_URL is not set");
        return ExitCode::FAILURE;
    };

    let db = match PgDb::connect(&database_url, 1).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Could not connect to database");
            return ExitCode::FAILURE;
        }
    };
    tracing::info!("Connected; attempting INSERT into email_list");

    match db.check_insert_permission().await {
        Ok(email) => {
            tracing::info!(probe = %email, "INSERT permitted (probe row rolled back)");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "INSERT failed");
            ExitCode::FAILURE
        }
    }
}
