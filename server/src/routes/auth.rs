//! Auth routes: registration, password login, session lookup, logout,
//! email verification, password reset and sign-in with Google.
//!
//! Every JSON endpoint that changes who is signed in, or whether their email
//! is verified, answers with the updated identity so the client can publish
//! it to its session store without a second round trip. The Google flow is a
//! pair of full-page redirects instead; the client picks the session up from
//! `/api/auth/me` when the app loads again.

use axum::extract::{FromRef, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use time::Duration;

use crate::services::account::{self, AccountError};
use crate::services::google::{self, GoogleError};
use crate::services::session::{self, SessionUser};
use crate::services::verification::{self, CodeEmail, VerificationError};
use crate::state::AppState;

const COOKIE_NAME: &str = "session_token";
const SESSION_DAYS: i64 = 30;
const OAUTH_STATE_COOKIE: &str = "oauth_state";
const OAUTH_NEXT_COOKIE: &str = "oauth_next";
const OAUTH_COOKIE_MINUTES: i64 = 10;

fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::days(SESSION_DAYS))
        .build()
}

fn cleared_cookie(secure: bool) -> Cookie<'static> {
    expired_cookie(COOKIE_NAME, secure)
}

fn expired_cookie(name: &'static str, secure: bool) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::ZERO)
        .build()
}

fn oauth_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(Duration::minutes(OAUTH_COOKIE_MINUTES))
        .build()
}

/// Keep post-sign-in redirects on this site: a single leading `/`, no
/// scheme-relative `//host` and no backslashes.
pub(crate) fn safe_next(next: Option<&str>) -> String {
    match next.map(str::trim) {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => path.to_owned(),
        _ => "/".to_owned(),
    }
}

pub(crate) fn account_error_to_status(err: AccountError) -> StatusCode {
    match err {
        AccountError::InvalidEmail | AccountError::WeakPassword | AccountError::InvalidResetCode => {
            StatusCode::BAD_REQUEST
        }
        AccountError::EmailTaken => StatusCode::CONFLICT,
        AccountError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        AccountError::Hash(_) | AccountError::Db(_) => {
            tracing::error!(error = %err, "account operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn verification_error_to_status(err: VerificationError) -> StatusCode {
    match err {
        VerificationError::InvalidCode | VerificationError::VerificationFailed => StatusCode::BAD_REQUEST,
        VerificationError::EmailDelivery(_) => StatusCode::BAD_GATEWAY,
        VerificationError::Db(_) => {
            tracing::error!(error = %err, "verification operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub(crate) fn google_error_to_status(err: &GoogleError) -> StatusCode {
    match err {
        GoogleError::UnverifiedEmail => StatusCode::FORBIDDEN,
        GoogleError::AlreadyLinked => StatusCode::CONFLICT,
        GoogleError::TokenExchange(_) | GoogleError::UserInfo(_) => StatusCode::BAD_GATEWAY,
        GoogleError::AuthorizeUrl(_) | GoogleError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn internal(err: sqlx::Error) -> StatusCode {
    tracing::error!(error = %err, "database error");
    StatusCode::INTERNAL_SERVER_ERROR
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Authenticated user extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthUser {
    pub user: SessionUser,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let user = session::validate_session(&app_state.pool, token)
            .await
            .map_err(internal)?
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { user, token: token.to_owned() })
    }
}

// =============================================================================
// BODIES
// =============================================================================

#[derive(Deserialize)]
pub struct CredentialsBody {
    email: String,
    password: String,
}

#[derive(Deserialize)]
pub struct ConfirmBody {
    code: String,
}

#[derive(Deserialize)]
pub struct ResetRequestBody {
    email: String,
}

#[derive(Deserialize)]
pub struct ResetBody {
    email: String,
    code: String,
    password: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct VerificationSent {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// Registration answer: the new identity plus, in echo mode, the first
/// verification code.
#[derive(Debug, Serialize)]
pub struct Registered {
    #[serde(flatten)]
    pub user: SessionUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verification_code: Option<String>,
}

#[derive(Deserialize)]
pub struct GoogleStartQuery {
    next: Option<String>,
}

#[derive(Deserialize)]
pub struct GoogleCallbackQuery {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn start_session(state: &AppState, user_id: uuid::Uuid) -> Result<(CookieJar, SessionUser), StatusCode> {
    let token = session::create_session(&state.pool, user_id).await.map_err(internal)?;
    let user = session::load_user(&state.pool, user_id)
        .await
        .map_err(internal)?
        .ok_or(StatusCode::INTERNAL_SERVER_ERROR)?;
    let jar = CookieJar::new().add(session_cookie(token, state.config.cookie_secure));
    Ok((jar, user))
}

/// `POST /api/auth/register`: create an unverified account, mail a code,
/// and sign the new user in.
pub async fn register(State(state): State<AppState>, Json(body): Json<CredentialsBody>) -> Response {
    let user_id = match account::register(&state.pool, &body.email, &body.password).await {
        Ok(id) => id,
        Err(e) => return account_error_to_status(e).into_response(),
    };
    tracing::info!(%user_id, "account registered");

    let verification_code = match verification::issue_code(&state.pool, user_id).await {
        Ok(code) => {
            let email = account::normalize_email(&body.email).unwrap_or_default();
            verification::deliver_code(&state.config, &email, &code, CodeEmail::Verification).await;
            state.config.email_code_echo.then_some(code)
        }
        Err(e) => {
            tracing::warn!(error = %e, %user_id, "initial verification code not issued");
            None
        }
    };

    match start_session(&state, user_id).await {
        Ok((jar, user)) => (StatusCode::CREATED, jar, Json(Registered { user, verification_code })).into_response(),
        Err(status) => status.into_response(),
    }
}

/// `POST /api/auth/login`: check the password and set the session cookie.
pub async fn login(State(state): State<AppState>, Json(body): Json<CredentialsBody>) -> Response {
    let user_id = match account::authenticate(&state.pool, &body.email, &body.password).await {
        Ok(id) => id,
        Err(e) => return account_error_to_status(e).into_response(),
    };

    match start_session(&state, user_id).await {
        Ok((jar, user)) => (jar, Json(user)).into_response(),
        Err(status) => status.into_response(),
    }
}

/// `GET /api/auth/me`: return current user.
pub async fn me(auth: AuthUser) -> Json<SessionUser> {
    Json(auth.user)
}

/// `POST /api/auth/logout`: delete session, clear cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(e) = session::delete_session(&state.pool, &auth.token).await {
        tracing::warn!(error = %e, "session delete failed during logout");
    }

    let jar = CookieJar::new().add(cleared_cookie(state.config.cookie_secure));
    (jar, StatusCode::NO_CONTENT)
}

/// `POST /api/auth/email/send-verification`: issue and mail a fresh code.
pub async fn send_verification(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<VerificationSent>, StatusCode> {
    if auth.user.email_verified {
        return Ok(Json(VerificationSent { ok: true, code: None }));
    }

    let code = verification::issue_code(&state.pool, auth.user.id)
        .await
        .map_err(verification_error_to_status)?;
    verification::deliver_code(&state.config, &auth.user.email, &code, CodeEmail::Verification).await;

    let code = state.config.email_code_echo.then_some(code);
    Ok(Json(VerificationSent { ok: true, code }))
}

/// `POST /api/auth/email/confirm`: consume a code and return the now
/// verified identity.
pub async fn confirm_verification(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ConfirmBody>,
) -> Result<Json<SessionUser>, StatusCode> {
    if !auth.user.email_verified {
        verification::confirm_code(&state.pool, auth.user.id, &body.code)
            .await
            .map_err(verification_error_to_status)?;
        tracing::info!(user_id = %auth.user.id, "email verified");
    }

    let user = session::load_user(&state.pool, auth.user.id)
        .await
        .map_err(internal)?
        .ok_or(StatusCode::UNAUTHORIZED)?;
    Ok(Json(user))
}

// =============================================================================
// PASSWORD RESET
// =============================================================================

/// `POST /api/auth/password/reset-request`: mail a reset code. Answers the
/// same for unknown emails.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(body): Json<ResetRequestBody>,
) -> Result<Json<VerificationSent>, StatusCode> {
    let issued = account::issue_reset_code(&state.pool, &body.email)
        .await
        .map_err(account_error_to_status)?;

    let Some((user_id, code)) = issued else {
        return Ok(Json(VerificationSent { ok: true, code: None }));
    };
    tracing::info!(%user_id, "password reset requested");

    let email = account::normalize_email(&body.email).unwrap_or_default();
    verification::deliver_code(&state.config, &email, &code, CodeEmail::PasswordReset).await;

    let code = state.config.email_code_echo.then_some(code);
    Ok(Json(VerificationSent { ok: true, code }))
}

/// `POST /api/auth/password/reset`: consume a reset code, set the new
/// password and sign the browser out everywhere.
pub async fn reset_password(State(state): State<AppState>, Json(body): Json<ResetBody>) -> Response {
    match account::reset_password(&state.pool, &body.email, &body.code, &body.password).await {
        Ok(user_id) => {
            tracing::info!(%user_id, "password reset");
            let jar = CookieJar::new().add(cleared_cookie(state.config.cookie_secure));
            (jar, StatusCode::NO_CONTENT).into_response()
        }
        Err(e) => account_error_to_status(e).into_response(),
    }
}

// =============================================================================
// GOOGLE SIGN-IN
// =============================================================================

/// `GET /auth/google`: redirect to Google's consent screen, remembering the
/// CSRF state and the page to come back to.
pub async fn google_redirect(State(state): State<AppState>, Query(params): Query<GoogleStartQuery>) -> Response {
    let Some(config) = &state.config.google else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Google sign-in not configured").into_response();
    };

    let oauth_state = session::generate_token();
    let url = match google::authorize_url(config, &oauth_state) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(error = %e, "google authorize url");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let secure = state.config.cookie_secure;
    let jar = CookieJar::new()
        .add(oauth_cookie(OAUTH_STATE_COOKIE, oauth_state, secure))
        .add(oauth_cookie(OAUTH_NEXT_COOKIE, safe_next(params.next.as_deref()), secure));
    (jar, Redirect::temporary(&url)).into_response()
}

/// `GET /auth/google/callback`: check state, exchange the code, upsert the
/// user, set the session cookie and return to the remembered page.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<GoogleCallbackQuery>,
) -> Response {
    let Some(config) = &state.config.google else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Google sign-in not configured").into_response();
    };
    let secure = state.config.cookie_secure;
    let next = safe_next(jar.get(OAUTH_NEXT_COOKIE).map(Cookie::value));
    let expected_state = jar
        .get(OAUTH_STATE_COOKIE)
        .map(|c| c.value().to_owned())
        .unwrap_or_default();
    let jar = jar
        .add(expired_cookie(OAUTH_STATE_COOKIE, secure))
        .add(expired_cookie(OAUTH_NEXT_COOKIE, secure));

    // Cancelled on the consent screen.
    if let Some(error) = params.error.as_deref() {
        tracing::info!(%error, "google sign-in abandoned");
        return (jar, Redirect::temporary("/login")).into_response();
    }

    let (Some(code), Some(callback_state)) = (params.code.as_deref(), params.state.as_deref()) else {
        return (jar, (StatusCode::BAD_REQUEST, "missing oauth code or state")).into_response();
    };
    if expected_state.is_empty() || expected_state != callback_state {
        return (jar, (StatusCode::UNAUTHORIZED, "invalid oauth state")).into_response();
    }

    let user_id = match sign_in_with_google(&state, config, code).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "google sign-in failed");
            return (jar, (google_error_to_status(&e), "Google sign-in failed")).into_response();
        }
    };

    match session::create_session(&state.pool, user_id).await {
        Ok(token) => {
            tracing::info!(%user_id, "signed in with google");
            let jar = jar.add(session_cookie(token, secure));
            (jar, Redirect::temporary(&next)).into_response()
        }
        Err(e) => (jar, internal(e)).into_response(),
    }
}

async fn sign_in_with_google(
    state: &AppState,
    config: &crate::config::GoogleOAuth,
    code: &str,
) -> Result<uuid::Uuid, GoogleError> {
    let access_token = google::exchange_code(config, code).await?;
    let google_user = google::fetch_google_user(&access_token).await?;
    google::upsert_user(&state.pool, &google_user).await
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
