//! Email verification codes.
//!
//! Issues short-lived six-character codes for a signed-in user, mails them
//! through Resend (or hands them back in development), and marks the user's
//! email verified when a code is confirmed. Only the SHA-256 of a code is
//! stored; each code allows a handful of wrong guesses before it is burned.
//!
//! Password reset codes share the alphabet, hashing and mail delivery here;
//! their storage lives with the accounts in `account.rs`.

use rand::Rng;
use resend_rs::Resend;
use resend_rs::types::CreateEmailBaseOptions;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::config::ServerConfig;

const CODE_LEN: usize = 6;
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
pub(crate) const MAX_FAILED_ATTEMPTS: i32 = 5;
const VERIFY_EMAIL_TEMPLATE: &str = include_str!("../../templates/verify_email.html");
const PASSWORD_RESET_TEMPLATE: &str = include_str!("../../templates/password_reset.html");

/// Which mail a code goes out in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeEmail {
    Verification,
    PasswordReset,
}

impl CodeEmail {
    fn subject(self) -> &'static str {
        match self {
            Self::Verification => "Your Bookclub verification code",
            Self::PasswordReset => "Reset your Bookclub password",
        }
    }

    fn template(self) -> &'static str {
        match self {
            Self::Verification => VERIFY_EMAIL_TEMPLATE,
            Self::PasswordReset => PASSWORD_RESET_TEMPLATE,
        }
    }
}

/// What [`deliver_code`] did with a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Sent,
    Failed,
    /// No mailer; the code was logged and the caller may return it.
    Echoed,
    /// No mailer and echo disabled; the code went nowhere.
    Dropped,
}

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("invalid code")]
    InvalidCode,
    #[error("expired or incorrect code")]
    VerificationFailed,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
    #[error("email delivery failed: {0}")]
    EmailDelivery(String),
}

#[must_use]
pub fn normalize_code(code: &str) -> Option<String> {
    let normalized = code.trim().to_ascii_uppercase();
    if normalized.len() != CODE_LEN || !normalized.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
        return None;
    }
    Some(normalized)
}

#[must_use]
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LEN)
        .map(|_| {
            let idx = rng.random_range(0..CODE_ALPHABET.len());
            char::from(CODE_ALPHABET[idx])
        })
        .collect()
}

#[must_use]
pub fn hash_code(code: &str) -> String {
    let digest = Sha256::digest(code.as_bytes());
    super::session::bytes_to_hex(&digest)
}

/// Replace any outstanding code for `user_id` with a fresh one.
pub async fn issue_code(pool: &PgPool, user_id: Uuid) -> Result<String, VerificationError> {
    sqlx::query("DELETE FROM email_verification_codes WHERE user_id = $1 AND consumed_at IS NULL")
        .bind(user_id)
        .execute(pool)
        .await?;

    let code = generate_code();
    sqlx::query("INSERT INTO email_verification_codes (user_id, code_hash) VALUES ($1, $2)")
        .bind(user_id)
        .bind(hash_code(&code))
        .execute(pool)
        .await?;

    Ok(code)
}

/// Consume the user's latest live code if it matches, and mark the email
/// verified. A wrong guess counts against the code.
pub async fn confirm_code(pool: &PgPool, user_id: Uuid, code: &str) -> Result<(), VerificationError> {
    let normalized = normalize_code(code).ok_or(VerificationError::InvalidCode)?;
    let code_hash = hash_code(&normalized);

    let consumed = sqlx::query(
        r"UPDATE email_verification_codes
          SET consumed_at = now()
          WHERE id = (
              SELECT id
              FROM email_verification_codes
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
    .bind(&code_hash)
    .fetch_optional(pool)
    .await?;

    if consumed.is_none() {
        sqlx::query(
            r"UPDATE email_verification_codes
              SET attempts = attempts + 1,
                  consumed_at = CASE WHEN attempts + 1 >= $2 THEN now() ELSE consumed_at END
              WHERE id = (
                  SELECT id
                  FROM email_verification_codes
                  WHERE user_id = $1
                    AND consumed_at IS NULL
                    AND expires_at > now()
                  ORDER BY created_at DESC
                  LIMIT 1
              )",
        )
        .bind(user_id)
        .bind(MAX_FAILED_ATTEMPTS)
        .execute(pool)
        .await?;
        return Err(VerificationError::VerificationFailed);
    }

    sqlx::query("UPDATE users SET email_verified = TRUE WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

#[must_use]
pub fn render_code_email(kind: CodeEmail, email: &str, code: &str) -> String {
    kind.template()
        .replace("{{EMAIL}}", email)
        .replace("{{CODE}}", code)
}

pub async fn send_code_email(
    resend_api_key: &str,
    resend_from: &str,
    to_email: &str,
    code: &str,
    kind: CodeEmail,
) -> Result<(), VerificationError> {
    let resend = Resend::new(resend_api_key);
    let to = [to_email];
    let subject = kind.subject();
    let html = render_code_email(kind, to_email, code);

    let email = CreateEmailBaseOptions::new(resend_from, to, subject).with_html(&html);
    resend
        .emails
        .send(email)
        .await
        .map_err(|e| VerificationError::EmailDelivery(e.to_string()))?;
    Ok(())
}

/// Mail `code` if delivery is configured. Failures are logged, not returned,
/// so registration still succeeds and the user can ask for a resend.
///
/// Without a mailer the code is logged when `email_code_echo` is on, and the
/// calling route returns it in its response body.
pub async fn deliver_code(config: &ServerConfig, to_email: &str, code: &str, kind: CodeEmail) -> Delivery {
    match &config.email {
        Some(delivery) => match send_code_email(&delivery.api_key, &delivery.from, to_email, code, kind).await {
            Ok(()) => Delivery::Sent,
            Err(e) => {
                tracing::warn!(error = %e, ?kind, "code email not sent");
                Delivery::Failed
            }
        },
        None if config.email_code_echo => {
            tracing::info!(to = %to_email, %code, ?kind, "email delivery not configured; echoing code");
            Delivery::Echoed
        }
        None => {
            tracing::warn!(?kind, "email delivery not configured and code echo disabled; code dropped");
            Delivery::Dropped
        }
    }
}

#[cfg(test)]
#[path = "verification_test.rs"]
mod tests;
