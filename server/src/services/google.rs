//! Sign-in with Google: authorization URL, code exchange, userinfo fetch and
//! user upsert.
//!
//! DESIGN
//! ======
//! A Google account is keyed by its stable `sub`. The first sign-in either
//! links the `sub` to an existing account with the same (Google-verified)
//! email or creates a password-less account. Google has already verified the
//! address, so these accounts skip the email verification step and land on
//! profile setup.

use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::account::normalize_email;
use crate::config::GoogleOAuth;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";
const USERINFO_ENDPOINT: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPE: &str = "openid email profile";

#[derive(Debug, thiserror::Error)]
pub enum GoogleError {
    #[error("authorization url: {0}")]
    AuthorizeUrl(String),
    #[error("google token exchange failed: {0}")]
    TokenExchange(String),
    #[error("google userinfo error: {0}")]
    UserInfo(String),
    #[error("google account email is not verified")]
    UnverifiedEmail,
    #[error("email is already linked to another google account")]
    AlreadyLinked,
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Build the consent-screen URL. `state` is echoed back to the callback.
pub fn authorize_url(config: &GoogleOAuth, state: &str) -> Result<String, GoogleError> {
    reqwest::Url::parse_with_params(
        AUTHORIZE_ENDPOINT,
        &[
            ("client_id", config.client_id.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", SCOPE),
            ("state", state),
            ("prompt", "select_account"),
        ],
    )
    .map(String::from)
    .map_err(|e| GoogleError::AuthorizeUrl(e.to_string()))
}

#[derive(Debug, serde::Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct GoogleUser {
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    pub name: Option<String>,
}

/// Exchange an authorization code for an access token.
pub async fn exchange_code(config: &GoogleOAuth, code: &str) -> Result<String, GoogleError> {
    let client = reqwest::Client::new();
    let resp = client
        .post(TOKEN_ENDPOINT)
        .form(&[
            ("code", code),
            ("client_id", config.client_id.as_str()),
            ("client_secret", config.client_secret.as_str()),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| GoogleError::TokenExchange(e.to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| GoogleError::TokenExchange(e.to_string()))?;
    if !status.is_success() {
        return Err(GoogleError::TokenExchange(format!("{status}: {body}")));
    }
    let token_resp: TokenResponse =
        serde_json::from_str(&body).map_err(|_| GoogleError::TokenExchange(format!("unexpected response: {body}")))?;
    Ok(token_resp.access_token)
}

/// Fetch the signed-in Google user's OpenID claims.
pub async fn fetch_google_user(access_token: &str) -> Result<GoogleUser, GoogleError> {
    let client = reqwest::Client::new();
    let resp = client
        .get(USERINFO_ENDPOINT)
        .bearer_auth(access_token)
        .send()
        .await
        .map_err(|e| GoogleError::UserInfo(e.to_string()))?;

    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        return Err(GoogleError::UserInfo(format!("{status}: {body}")));
    }

    resp.json::<GoogleUser>()
        .await
        .map_err(|e| GoogleError::UserInfo(e.to_string()))
}

/// Find or create the account for a Google user. Returns the user's UUID.
pub async fn upsert_user(pool: &PgPool, google: &GoogleUser) -> Result<Uuid, GoogleError> {
    if let Some(row) = sqlx::query("SELECT id FROM users WHERE google_sub = $1")
        .bind(&google.sub)
        .fetch_optional(pool)
        .await?
    {
        return Ok(row.get("id"));
    }

    if !google.email_verified {
        return Err(GoogleError::UnverifiedEmail);
    }
    let email = normalize_email(&google.email).ok_or_else(|| GoogleError::UserInfo("unusable email".to_owned()))?;

    // Linking to an account whose email was never verified drops its
    // password: whoever registered it did not prove they own the address.
    let row = sqlx::query(
        r"INSERT INTO users (email, google_sub, email_verified)
          VALUES ($1, $2, TRUE)
          ON CONFLICT (email) DO UPDATE
          SET google_sub = EXCLUDED.google_sub,
              password_hash = CASE WHEN users.email_verified THEN users.password_hash ELSE NULL END,
              email_verified = TRUE
          WHERE users.google_sub IS NULL
          RETURNING id",
    )
    .bind(&email)
    .bind(&google.sub)
    .fetch_optional(pool)
    .await?;

    row.map(|r| r.get("id")).ok_or(GoogleError::AlreadyLinked)
}

#[cfg(test)]
#[path = "google_test.rs"]
mod tests;
