//! Server configuration parsed from environment variables.
//!
//! `main` loads `.env` through `dotenvy` first, so everything here can come
//! from either the process environment or a local `.env` file.

use std::fmt;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Resend credentials for mailing verification codes.
#[derive(Clone, PartialEq, Eq)]
pub struct EmailDelivery {
    pub api_key: String,
    pub from: String,
}

impl fmt::Debug for EmailDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailDelivery")
            .field("api_key", &"<redacted>")
            .field("from", &self.from)
            .finish()
    }
}

/// Google OAuth client registration. Sign-in with Google is disabled when
/// any of the three values is missing.
#[derive(Clone, PartialEq, Eq)]
pub struct GoogleOAuth {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
}

impl fmt::Debug for GoogleOAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleOAuth")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("redirect_uri", &self.redirect_uri)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
    /// Return verification codes in the API response. Development only.
    pub email_code_echo: bool,
    /// `None` when `RESEND_API_KEY` / `RESEND_FROM` are not both set.
    pub email: Option<EmailDelivery>,
    /// `None` unless all `GOOGLE_*` variables are set.
    pub google: Option<GoogleOAuth>,
}

impl ServerConfig {
    /// Build typed server config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `DB_MAX_CONNECTIONS`: default 5
    /// - `COOKIE_SECURE`: default false
    /// - `EMAIL_CODE_ECHO`: default false
    /// - `RESEND_API_KEY` + `RESEND_FROM`: email delivery
    /// - `GOOGLE_CLIENT_ID` + `GOOGLE_CLIENT_SECRET` + `GOOGLE_REDIRECT_URI`:
    ///   sign-in with Google
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a required variable is missing or a
    /// numeric/boolean variable does not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let port = parse_or("PORT", lookup("PORT"), DEFAULT_PORT)?;
        let db_max_connections = parse_or("DB_MAX_CONNECTIONS", lookup("DB_MAX_CONNECTIONS"), DEFAULT_DB_MAX_CONNECTIONS)?;
        let cookie_secure = bool_or("COOKIE_SECURE", lookup("COOKIE_SECURE"), false)?;
        let email_code_echo = bool_or("EMAIL_CODE_ECHO", lookup("EMAIL_CODE_ECHO"), false)?;
        let email = match (lookup("RESEND_API_KEY"), lookup("RESEND_FROM")) {
            (Some(api_key), Some(from)) if !api_key.trim().is_empty() && !from.trim().is_empty() => {
                Some(EmailDelivery { api_key, from })
            }
            _ => None,
        };
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let google = match (present("GOOGLE_CLIENT_ID"), present("GOOGLE_CLIENT_SECRET"), present("GOOGLE_REDIRECT_URI")) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => {
                Some(GoogleOAuth { client_id, client_secret, redirect_uri })
            }
            _ => None,
        };

        Ok(Self { database_url, port, db_max_connections, cookie_secure, email_code_echo, email, google })
    }
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn bool_or(key: &'static str, raw: Option<String>, default: bool) -> Result<bool, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid { key, value }),
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError> {
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid { key, value }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
