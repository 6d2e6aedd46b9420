//! Profile records: the application-level account created once per user.
//!
//! DESIGN
//! ======
//! A profile row exists iff the account is provisioned. Creation is a single
//! `INSERT ... ON CONFLICT DO NOTHING`, so a second attempt is reported as a
//! conflict rather than overwriting. Records go over the wire as
//! [`gate::ProfileRecord`], the same type the client guard reads.

use gate::ProfileRecord;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

const MIN_NAME_LEN: usize = 2;
const MAX_NAME_LEN: usize = 40;

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("invalid display name: {0}")]
    InvalidDisplayName(&'static str),
    #[error("settings must be a JSON object")]
    InvalidSettings,
    #[error("profile already exists for {0}")]
    Conflict(Uuid),
    #[error("profile not found for {0}")]
    NotFound(Uuid),
    #[error("database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Trim, collapse whitespace and bound the length of a display name.
pub fn validate_display_name(raw: &str) -> Result<String, ProfileError> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let len = name.chars().count();
    if len < MIN_NAME_LEN {
        return Err(ProfileError::InvalidDisplayName("too short"));
    }
    if len > MAX_NAME_LEN {
        return Err(ProfileError::InvalidDisplayName("too long"));
    }
    Ok(name)
}

/// Settings must be an object; `null` means "no settings".
pub fn normalize_settings(settings: Value) -> Result<Value, ProfileError> {
    match settings {
        Value::Null => Ok(Value::Object(Map::new())),
        Value::Object(_) => Ok(settings),
        _ => Err(ProfileError::InvalidSettings),
    }
}

const PROFILE_COLUMNS: &str = r#"user_id, display_name, settings,
    to_char(created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD"T"HH24:MI:SS"Z"') AS created_at"#;

fn record_from_row(row: &PgRow) -> ProfileRecord {
    let id: Uuid = row.get("user_id");
    ProfileRecord {
        id: id.to_string(),
        display_name: row.get("display_name"),
        settings: row.get("settings"),
        created_at: row.get("created_at"),
    }
}

pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<ProfileRecord>, ProfileError> {
    let row = sqlx::query(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"))
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.as_ref().map(record_from_row))
}

/// Create the user's profile exactly once.
pub async fn create_profile(
    pool: &PgPool,
    user_id: Uuid,
    display_name: &str,
    settings: Value,
) -> Result<ProfileRecord, ProfileError> {
    let display_name = validate_display_name(display_name)?;
    let settings = normalize_settings(settings)?;

    let row = sqlx::query(&format!(
        r"INSERT INTO profiles (user_id, display_name, settings)
          VALUES ($1, $2, $3)
          ON CONFLICT (user_id) DO NOTHING
          RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&display_name)
    .bind(&settings)
    .fetch_optional(pool)
    .await?;

    row.as_ref()
        .map(record_from_row)
        .ok_or(ProfileError::Conflict(user_id))
}

/// Change the display name of an existing profile.
pub async fn rename(pool: &PgPool, user_id: Uuid, display_name: &str) -> Result<ProfileRecord, ProfileError> {
    let display_name = validate_display_name(display_name)?;

    let row = sqlx::query(&format!(
        r"UPDATE profiles
          SET display_name = $2, updated_at = now()
          WHERE user_id = $1
          RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&display_name)
    .fetch_optional(pool)
    .await?;

    row.as_ref()
        .map(record_from_row)
        .ok_or(ProfileError::NotFound(user_id))
}

/// Shallow-merge `patch` into the stored settings object.
pub async fn update_settings(pool: &PgPool, user_id: Uuid, patch: Value) -> Result<ProfileRecord, ProfileError> {
    let patch = normalize_settings(patch)?;

    let row = sqlx::query(&format!(
        r"UPDATE profiles
          SET settings = settings || $2, updated_at = now()
          WHERE user_id = $1
          RETURNING {PROFILE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(&patch)
    .fetch_optional(pool)
    .await?;

    row.as_ref()
        .map(record_from_row)
        .ok_or(ProfileError::NotFound(user_id))
}

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;
