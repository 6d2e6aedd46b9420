//! Session token management.
//!
//! ARCHITECTURE
//! ============
//! HTTP auth uses long-lived opaque session tokens stored in an `HttpOnly`
//! cookie. Validating a token also resolves the identity the client gate
//! consumes: id, email, verification flag and (once provisioned) the
//! profile's display name.

use std::fmt::Write;

use rand::Rng;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

/// Identity returned by `/api/auth/me` and the login/verify endpoints.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub email_verified: bool,
    /// Profile display name; `None` until the account is provisioned.
    pub display_name: Option<String>,
}

const USER_COLUMNS: &str = "u.id, u.email, u.email_verified, p.display_name";

fn user_from_row(row: &PgRow) -> SessionUser {
    SessionUser {
        id: row.get("id"),
        email: row.get("email"),
        email_verified: row.get("email_verified"),
        display_name: row.get("display_name"),
    }
}

/// Create a session for the given user, returning the token.
pub async fn create_session(pool: &PgPool, user_id: Uuid) -> Result<String, sqlx::Error> {
    let token = generate_token();
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(&token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(token)
}

/// Validate a session token and return the associated user.
pub async fn validate_session(pool: &PgPool, token: &str) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r"SELECT {USER_COLUMNS}
          FROM sessions s
          JOIN users u ON u.id = s.user_id
          LEFT JOIN profiles p ON p.user_id = u.id
          WHERE s.token = $1 AND s.expires_at > now()"
    ))
    .bind(token)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Load a user by id, e.g. right after login or verification.
pub async fn load_user(pool: &PgPool, user_id: Uuid) -> Result<Option<SessionUser>, sqlx::Error> {
    let row = sqlx::query(&format!(
        r"SELECT {USER_COLUMNS}
          FROM users u
          LEFT JOIN profiles p ON p.user_id = u.id
          WHERE u.id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(user_from_row))
}

/// Delete a session by token.
pub async fn delete_session(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
