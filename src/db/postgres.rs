// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgreSQL pool wrapper with typed operations.
//!
//! Provides single-statement operations for:
//! - Users (login lookups, admin flag, registration)
//! - Email list (newsletter signups)
//!
//! Every statement is parameterized; no values are interpolated into SQL.

use crate::error::AppError;
use crate::models::User;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

const USER_COLUMNS: &str =
    "id, email, password_hash, is_active, is_banned, is_admin, created_at, last_login";

/// Source recorded for probe rows written by [`PgDb::check_insert_permission`].
pub const INSERT_CHECK_SOURCE: &str = "insert_check";

/// PostgreSQL database client.
#[derive(Clone)]
pub struct PgDb {
    pool: Option<PgPool>,
}

impl PgDb {
    /// Connect to PostgreSQL and verify the connection.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await?;

        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool: Some(pool) }
    }

    /// Create a mock client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { pool: None }
    }

    fn pool(&self) -> Result<&PgPool, AppError> {
        self.pool
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Look up a user by email address.
    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(self.pool()?)
            .await?)
    }

    /// Look up a user by id.
    pub async fn find_user_by_id(&self, user_id: i32) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool()?)
            .await?)
    }

    /// Admin flag for a user, or `None` if the user does not exist.
    pub async fn is_admin(&self, user_id: i32) -> Result<Option<bool>, AppError> {
        Ok(
            sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = $1")
                .bind(user_id)
                .fetch_optional(self.pool()?)
                .await?,
        )
    }

    /// Stamp the user's last successful login.
    pub async fn record_login(&self, user_id: i32) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(self.pool()?)
            .await?;
        Ok(())
    }

    /// Insert a new user. Returns `None` if the email is already registered.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<Option<User>, AppError> {
        let sql = format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) \
             ON CONFLICT (email) DO NOTHING RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .bind(password_hash)
            .fetch_optional(self.pool()?)
            .await?)
    }

    // ─── Email List ──────────────────────────────────────────────

    /// Add an address to the email list. Returns false if it was already there.
    pub async fn add_to_email_list(&self, email: &str, source: &str) -> Result<bool, AppError> {
        let result = sqlx::query(
            "INSERT INTO email_list (email, source) VALUES ($1, $2) ON CONFLICT (email) DO NOTHING",
        )
        .bind(email)
        .bind(source)
        .execute(self.pool()?)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    // ─── Diagnostics ─────────────────────────────────────────────

    /// Check that the connected role may INSERT into `email_list`.
    ///
    /// The probe row is written inside a transaction that is always rolled
    /// back, so the table is left untouched. Returns the probe address.
    pub async fn check_insert_permission(&self) -> Result<String, AppError> {
        let probe = format!(
            "insert-check+{}@polytrade.invalid",
            chrono::Utc::now().timestamp_millis()
        );

        let mut tx = self.pool()?.begin().await?;

        let inserted: String = sqlx::query_scalar(
            "INSERT INTO email_list (email, source) VALUES ($1, $2) RETURNING email",
        )
        .bind(&probe)
        .bind(INSERT_CHECK_SOURCE)
        .fetch_one(&mut *tx)
        .await?;

        tx.rollback().await?;

        tracing::debug!(email = %inserted, "Insert probe succeeded and was rolled back");
        Ok(inserted)
    }
}
