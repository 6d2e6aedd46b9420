//! Shared wire DTOs for the client/server boundary.
//!
//! DESIGN
//! ======
//! `Identity` and `ProfileRecord` come from the `gate` crate so the server's
//! JSON and the guard's inputs are the same types. Request bodies mirror the
//! server's handler extractors field for field.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};

pub use gate::{Identity, ProfileRecord};

/// Body of `POST /api/auth/login` and `POST /api/auth/register`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Body of `POST /api/auth/email/confirm`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmCode {
    pub code: String,
}

/// Response of `POST /api/auth/email/send-verification`.
///
/// `code` is only present when the server echoes codes (local development).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationSent {
    pub ok: bool,
    #[serde(default)]
    pub code: Option<String>,
}

/// Response of `POST /api/auth/register`: the new identity, plus the first
/// verification code when the server echoes codes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registered {
    #[serde(flatten)]
    pub identity: Identity,
    #[serde(default)]
    pub verification_code: Option<String>,
}

/// Body of `POST /api/auth/password/reset-request`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetRequest {
    pub email: String,
}

/// Body of `POST /api/auth/password/reset`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordReset {
    pub email: String,
    pub code: String,
    pub password: String,
}

/// Body of `PATCH /api/users/profile`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenameProfile {
    pub display_name: String,
}

/// Body of `POST /api/users/profile`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CreateProfile {
    pub display_name: String,
    pub settings: ProfileSettings,
}

/// Settings blob stored on the profile record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileSettings {
    pub theme: String,
    pub font_size: String,
    pub notify_replies: bool,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self { theme: "light".to_owned(), font_size: "medium".to_owned(), notify_replies: true }
    }
}

impl ProfileSettings {
    /// Read settings out of a profile record, tolerating missing or foreign keys.
    #[must_use]
    pub fn from_record(record: &ProfileRecord) -> Self {
        serde_json::from_value(record.settings.clone()).unwrap_or_default()
    }
}
