//! User model for storage and API.

use crate::time_utils::format_utc_rfc3339;
use chrono::{DateTime, Utc};
use serde::Serialize;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Row of the `users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub password_hash: String,
    pub is_active: bool,
    pub is_banned: bool,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Reason this account may not hold a session, if any.
    pub fn access_denied_reason(&self) -> Option<&'static str> {
        if self.is_banned {
            Some("Account is banned")
        } else if !self.is_active {
            Some("Account is inactive")
        } else {
            None
        }
    }
}

/// User as exposed over the API (no password hash).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PublicUser {
    pub id: i32,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            is_admin: user.is_admin,
            created_at: format_utc_rfc3339(user.created_at),
            last_login: user.last_login.map(format_utc_rfc3339),
        }
    }
}
