//! User profile routes.
//!
//! A profile is readable only by its owner. Creation requires a verified
//! email, mirroring the order the client guard walks the user through.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use gate::ProfileRecord;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::auth::AuthUser;
use crate::services::profile::{self, ProfileError};
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CreateProfileBody {
    display_name: String,
    #[serde(default)]
    settings: Value,
}

#[derive(Deserialize)]
pub struct RenameBody {
    display_name: String,
}

pub(crate) fn profile_error_to_status(err: ProfileError) -> StatusCode {
    match err {
        ProfileError::InvalidDisplayName(_) | ProfileError::InvalidSettings => StatusCode::BAD_REQUEST,
        ProfileError::Conflict(_) => StatusCode::CONFLICT,
        ProfileError::NotFound(_) => StatusCode::NOT_FOUND,
        ProfileError::Db(_) => {
            tracing::error!(error = %err, "profile operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// `GET /api/users/:id/profile`: the caller's own profile record.
pub async fn user_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileRecord>, StatusCode> {
    if auth.user.id != user_id {
        return Err(StatusCode::FORBIDDEN);
    }

    profile::get_profile(&state.pool, user_id)
        .await
        .map_err(profile_error_to_status)?
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

/// `POST /api/users/profile`: provision the caller's profile once.
pub async fn create_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<CreateProfileBody>,
) -> Result<impl IntoResponse, StatusCode> {
    if !auth.user.email_verified {
        return Err(StatusCode::FORBIDDEN);
    }

    let record = profile::create_profile(&state.pool, auth.user.id, &body.display_name, body.settings)
        .await
        .map_err(profile_error_to_status)?;
    tracing::info!(user_id = %auth.user.id, "profile provisioned");

    Ok((StatusCode::CREATED, Json(record)))
}

/// `PATCH /api/users/profile`: change the caller's display name.
pub async fn rename_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<RenameBody>,
) -> Result<Json<ProfileRecord>, StatusCode> {
    profile::rename(&state.pool, auth.user.id, &body.display_name)
        .await
        .map(Json)
        .map_err(profile_error_to_status)
}

/// `PATCH /api/users/profile/settings`: merge keys into the stored settings.
pub async fn update_settings(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(patch): Json<Value>,
) -> Result<Json<ProfileRecord>, StatusCode> {
    profile::update_settings(&state.pool, auth.user.id, patch)
        .await
        .map(Json)
        .map_err(profile_error_to_status)
}

#[cfg(test)]
#[path = "users_test.rs"]
mod tests;
