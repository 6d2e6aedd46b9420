//! Email + password accounts.
//!
//! Registration creates an unverified user; login checks the argon2 hash.
//! Emails are stored normalised (trimmed, lowercase) so lookups are exact.
//!
//! Password reset is a two-step exchange keyed by email: a six-character
//! code is mailed, then the code and a new password are posted together.
//! A successful reset revokes every session of the account.

use std::sync::LazyLock;

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::Rng;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::verification::{MAX_FAILED_ATTEMPTS, generate_code, hash_code, normalize_code};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("invalid email")]
    InvalidEmail,
    #[error("password too short")]
    WeakPassword,
    #[error("email already registered")]
    EmailTaken,
    #[error("incorrect email or password")]
    InvalidCredentials,
    #[error("expired or incorrect reset code")]
    InvalidResetCode,
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

/// Hash a password with Argon2id and a random salt.
///
/// # Errors
///
/// Returns [`AccountError::Hash`] if the hasher rejects its inputs.
pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| AccountError::Hash(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Hash(e.to_string()))
}

/// Check a password against a stored PHC hash string.
///
/// # Errors
///
/// Returns [`AccountError::Hash`] for a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AccountError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AccountError::Hash(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AccountError::Hash(e.to_string())),
    }
}

/// PHC hash checked in place of a missing one, so a login for an unknown
/// email or a password-less account costs the same as a wrong password.
fn dummy_hash() -> Option<&'static str> {
    static DUMMY: LazyLock<Option<String>> = LazyLock::new(|| hash_password("bookclub-placeholder").ok());
    DUMMY.as_deref()
}

fn reject_without_hash(password: &str) -> AccountError {
    if let Some(hash) = dummy_hash() {
        let _ = verify_password(password, hash);
    }
    AccountError::InvalidCredentials
}

fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::WeakPassword);
    }
    Ok(())
}

/// Create an unverified account. Returns the new user id.
pub async fn register(pool: &PgPool, email: &str, password: &str) -> Result<Uuid, AccountError> {
    let email = normalize_email(email).ok_or(AccountError::InvalidEmail)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let row = sqlx::query(
        r"INSERT INTO users (email, password_hash)
          VALUES ($1, $2)
          ON CONFLICT (email) DO NOTHING
          RETURNING id",
    )
    .bind(&email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    row.map(|r| r.get("id")).ok_or(AccountError::EmailTaken)
}

/// Check credentials and return the user id.
pub async fn authenticate(pool: &PgPool, email: &str, password: &str) -> Result<Uuid, AccountError> {
    let Some(email) = normalize_email(email) else {
        return Err(reject_without_hash(password));
    };
    let row = sqlx::query("SELECT id, password_hash FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?;

    // Google-only accounts have no password hash.
    let Some((id, hash)) = row.and_then(|r| {
        let hash: Option<String> = r.get("password_hash");
        hash.map(|h| (r.get::<Uuid, _>("id"), h))
    }) else {
        return Err(reject_without_hash(password));
    };

    if !verify_password(password, &hash)? {
        return Err(AccountError::InvalidCredentials);
    }
    Ok(id)
}

// =============================================================================
// PASSWORD RESET
// =============================================================================

/// Replace any outstanding reset code for the account behind `email`.
///
/// Returns `None` for an unknown email; callers answer the same either way so
/// the endpoint does not reveal which emails are registered.
pub async fn issue_reset_code(pool: &PgPool, email: &str) -> Result<Option<(Uuid, String)>, AccountError> {
    let Some(email) = normalize_email(email) else {
        return Ok(None);
    };
    let Some(row) = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };
    let user_id: Uuid = row.get("id");

    sqlx::query("DELETE FROM password_reset_codes WHERE user_id = $1 AND consumed_at IS NULL")
        .bind(user_id)
        .execute(pool)
        .await?;

    let code = generate_code();
    sqlx::query("INSERT INTO password_reset_codes (user_id, code_hash) VALUES ($1, $2)")
        .bind(user_id)
        .bind(hash_code(&code))
        .execute(pool)
        .await?;

    Ok(Some((user_id, code)))
}

/// Consume a reset code and set a new password. Every session of the account
/// is deleted, so other devices must sign in again.
pub async fn reset_password(pool: &PgPool, email: &str, code: &str, new_password: &str) -> Result<Uuid, AccountError> {
    let email = normalize_email(email).ok_or(AccountError::InvalidResetCode)?;
    let code = normalize_code(code).ok_or(AccountError::InvalidResetCode)?;
    validate_password(new_password)?;

    let user_id: Uuid = sqlx::query("SELECT id FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(pool)
        .await?
        .map(|r| r.get("id"))
        .ok_or(AccountError::InvalidResetCode)?;

    let password_hash = hash_password(new_password)?;
    let mut tx = pool.begin().await?;

    let consumed = sqlx::query(
        r"UPDATE password_reset_codes
          SET consumed_at = now()
          WHERE id = (
              SELECT id
              FROM password_reset_codes
              WHERE user_id = $1
                AND consumed_at IS NULL
                AND expires_at > now()
              ORDER BY created_at DESC
              LIMIT 1
          )
          AND code_hash = $2
          RETURNING id",
    )
    .bind(user_id)
    .bind(hash_code(&code))
    .fetch_optional(&mut *tx)
    .await?;

    if consumed.is_none() {
        sqlx::query(
            r"UPDATE password_reset_codes
              SET attempts = attempts + 1,
                  consumed_at = CASE WHEN attempts + 1 >= $2 THEN now() ELSE consumed_at END
              WHERE id = (
                  SELECT id
                  FROM password_reset_codes
                  WHERE user_id = $1
                    AND consumed_at IS NULL
                    AND expires_at > now()
                  ORDER BY created_at DESC
                  LIMIT 1
              )",
        )
        .bind(user_id)
        .bind(MAX_FAILED_ATTEMPTS)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        return Err(AccountError::InvalidResetCode);
    }

    sqlx::query("UPDATE users SET password_hash = $2 WHERE id = $1")
        .bind(user_id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM sessions WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(user_id)
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
