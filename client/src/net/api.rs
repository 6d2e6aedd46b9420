//! REST API helpers for communicating with the server.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): stubs returning `None`/error since these endpoints
//! are only meaningful in the browser.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Option`/`Result` outputs instead of panics so auth/profile
//! fetch failures degrade UI behavior without crashing hydration. Profile
//! reads and `/api/auth/me` return a typed [`StoreError`]: only a 401 means
//! "signed out", anything else is a failure the caller must not mistake for
//! an answer.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::cell::RefCell;

use async_trait::async_trait;
use gate::{ProfileStore, StoreError};

use super::types::{CreateProfile, Identity, ProfileRecord, ProfileSettings, Registered};
#[cfg(feature = "hydrate")]
use super::types::{ConfirmCode, Credentials, PasswordReset, RenameProfile, ResetRequest, VerificationSent};

#[cfg(any(test, feature = "hydrate"))]
fn user_profile_endpoint(user_id: &str) -> String {
    format!("/api/users/{user_id}/profile")
}

#[cfg(any(test, feature = "hydrate"))]
fn login_failed_message(status: u16) -> String {
    match status {
        401 => "Incorrect email or password.".to_owned(),
        _ => format!("login failed: {status}"),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn register_failed_message(status: u16) -> String {
    match status {
        409 => "That email is already registered.".to_owned(),
        400 => "Enter a valid email and a password of at least 8 characters.".to_owned(),
        _ => format!("register failed: {status}"),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn confirm_code_failed_message(status: u16) -> String {
    match status {
        400 | 401 => "That code is expired or incorrect.".to_owned(),
        _ => format!("verify code failed: {status}"),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn create_profile_failed_message(status: u16) -> String {
    match status {
        409 => "A profile already exists for this account.".to_owned(),
        _ => format!("profile setup failed: {status}"),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn reset_failed_message(status: u16) -> String {
    match status {
        400 => "That code is expired or incorrect, or the password is under 8 characters.".to_owned(),
        _ => format!("password reset failed: {status}"),
    }
}

#[cfg(any(test, feature = "hydrate"))]
fn profile_update_failed_message(status: u16) -> String {
    match status {
        400 => "Display names are 2 to 40 characters.".to_owned(),
        404 => "Finish setting up your profile first.".to_owned(),
        _ => format!("saving settings failed: {status}"),
    }
}

/// Non-OK `/api/auth/me` statuses: 401 is a definite "no session"; every
/// other status says nothing about the session.
#[cfg(any(test, feature = "hydrate"))]
fn me_status_outcome(status: u16) -> Result<Option<Identity>, StoreError> {
    match status {
        401 => Ok(None),
        _ => Err(StoreError::Status(status)),
    }
}

/// Fetch the currently authenticated identity from `/api/auth/me`.
///
/// # Errors
///
/// `Ok(None)` only for a 401. Transport failures, 5xx and undecodable
/// bodies are errors, and always on the server.
pub async fn fetch_current_user() -> Result<Option<Identity>, StoreError> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::get("/api/auth/me")
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        if !resp.ok() {
            return me_status_outcome(resp.status());
        }
        resp.json::<Identity>()
            .await
            .map(Some)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err(StoreError::Unavailable("not available on server".to_owned()))
    }
}

/// Sign in via `POST /api/auth/login`; the server sets the session cookie.
///
/// # Errors
///
/// Returns a user-facing message when the credentials are rejected or the request fails.
pub async fn login(email: &str, password: &str) -> Result<Identity, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = Credentials { email: email.to_owned(), password: password.to_owned() };
        let resp = gloo_net::http::Request::post("/api/auth/login")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(login_failed_message(resp.status()));
        }
        resp.json::<Identity>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, password);
        Err("not available on server".to_owned())
    }
}

/// Create an account via `POST /api/auth/register`. The new identity starts
/// unverified and the server mails a verification code (or echoes it).
///
/// # Errors
///
/// Returns a user-facing message when registration is rejected or the request fails.
pub async fn register(email: &str, password: &str) -> Result<Registered, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = Credentials { email: email.to_owned(), password: password.to_owned() };
        let resp = gloo_net::http::Request::post("/api/auth/register")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(register_failed_message(resp.status()));
        }
        resp.json::<Registered>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, password);
        Err("not available on server".to_owned())
    }
}

/// Log out the current user by calling `POST /api/auth/logout`.
pub async fn logout() {
    #[cfg(feature = "hydrate")]
    {
        let _ = gloo_net::http::Request::post("/api/auth/logout")
            .send()
            .await;
    }
}

/// Ask the server to mail a fresh verification code via
/// `POST /api/auth/email/send-verification`.
///
/// Returns the code itself when the server is configured to echo codes.
///
/// # Errors
///
/// Returns an error string if the HTTP request fails or the server responds with a non-OK status.
pub async fn send_verification_code() -> Result<Option<String>, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/auth/email/send-verification")
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("send code failed: {}", resp.status()));
        }
        let body: VerificationSent = resp.json().await.map_err(|e| e.to_string())?;
        if !body.ok {
            return Err("send code failed".to_owned());
        }
        Ok(body.code)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        Err("not available on server".to_owned())
    }
}

/// Confirm the emailed code via `POST /api/auth/email/confirm`, returning the
/// refreshed (now verified) identity.
///
/// # Errors
///
/// Returns a user-facing message if the code is rejected or the request fails.
pub async fn confirm_verification_code(code: &str) -> Result<Identity, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = ConfirmCode { code: code.to_owned() };
        let resp = gloo_net::http::Request::post("/api/auth/email/confirm")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(confirm_code_failed_message(resp.status()));
        }
        resp.json::<Identity>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = code;
        Err("not available on server".to_owned())
    }
}

/// Point read of a profile from `/api/users/{user_id}/profile`.
/// `Ok(None)` on 404.
///
/// # Errors
///
/// Returns a [`StoreError`] for transport failures, other non-OK statuses,
/// or an undecodable body.
pub async fn fetch_profile(user_id: &str) -> Result<Option<ProfileRecord>, StoreError> {
    #[cfg(feature = "hydrate")]
    {
        let url = user_profile_endpoint(user_id);
        let resp = gloo_net::http::Request::get(&url)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        match resp.status() {
            404 => Ok(None),
            status if !resp.ok() => Err(StoreError::Status(status)),
            _ => resp
                .json::<ProfileRecord>()
                .await
                .map(Some)
                .map_err(|e| StoreError::Decode(e.to_string())),
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = user_id;
        Err(StoreError::Unavailable("not available on server".to_owned()))
    }
}

/// Provision the signed-in user's profile via `POST /api/users/profile`.
///
/// # Errors
///
/// Returns a user-facing message if a profile already exists or the request fails.
pub async fn create_profile(body: &CreateProfile) -> Result<ProfileRecord, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::post("/api/users/profile")
            .json(body)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(create_profile_failed_message(resp.status()));
        }
        resp.json::<ProfileRecord>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = body;
        Err("not available on server".to_owned())
    }
}

/// Rename the signed-in user's profile via `PATCH /api/users/profile`.
///
/// # Errors
///
/// Returns a user-facing message if the name is rejected or the request fails.
pub async fn rename_profile(display_name: &str) -> Result<ProfileRecord, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = RenameProfile { display_name: display_name.to_owned() };
        let resp = gloo_net::http::Request::patch("/api/users/profile")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(profile_update_failed_message(resp.status()));
        }
        resp.json::<ProfileRecord>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = display_name;
        Err("not available on server".to_owned())
    }
}

/// Merge settings into the profile via `PATCH /api/users/profile/settings`.
/// Returns the stored record so the caller applies what the server kept.
///
/// # Errors
///
/// Returns a user-facing message if the request fails.
pub async fn update_settings(settings: &ProfileSettings) -> Result<ProfileRecord, String> {
    #[cfg(feature = "hydrate")]
    {
        let resp = gloo_net::http::Request::patch("/api/users/profile/settings")
            .json(settings)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(profile_update_failed_message(resp.status()));
        }
        resp.json::<ProfileRecord>().await.map_err(|e| e.to_string())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = settings;
        Err("not available on server".to_owned())
    }
}

/// Ask for a password reset code via `POST /api/auth/password/reset-request`.
/// The server answers the same for unknown emails.
///
/// Returns the code itself when the server is configured to echo codes.
///
/// # Errors
///
/// Returns an error string if the request fails.
pub async fn request_password_reset(email: &str) -> Result<Option<String>, String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = ResetRequest { email: email.to_owned() };
        let resp = gloo_net::http::Request::post("/api/auth/password/reset-request")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(format!("reset request failed: {}", resp.status()));
        }
        let body: VerificationSent = resp.json().await.map_err(|e| e.to_string())?;
        Ok(body.code)
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = email;
        Err("not available on server".to_owned())
    }
}

/// Set a new password with a reset code via `POST /api/auth/password/reset`.
/// The server ends every session of the account, this browser's included.
///
/// # Errors
///
/// Returns a user-facing message if the code or password is rejected.
pub async fn reset_password(email: &str, code: &str, password: &str) -> Result<(), String> {
    #[cfg(feature = "hydrate")]
    {
        let payload = PasswordReset { email: email.to_owned(), code: code.to_owned(), password: password.to_owned() };
        let resp = gloo_net::http::Request::post("/api/auth/password/reset")
            .json(&payload)
            .map_err(|e| e.to_string())?
            .send()
            .await
            .map_err(|e| e.to_string())?;
        if !resp.ok() {
            return Err(reset_failed_message(resp.status()));
        }
        Ok(())
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (email, code, password);
        Err("not available on server".to_owned())
    }
}

/// [`ProfileStore`] backed by the profile HTTP endpoint. Keeps the last
/// record it read so the caller can apply its settings once the read is
/// known to be current.
#[derive(Debug, Default)]
pub struct HttpProfileStore {
    last_read: RefCell<Option<ProfileRecord>>,
}

impl HttpProfileStore {
    /// The record returned by the most recent successful read, if any.
    pub fn take_last_read(&self) -> Option<ProfileRecord> {
        self.last_read.take()
    }
}

#[async_trait(?Send)]
impl ProfileStore for HttpProfileStore {
    async fn get_profile(&self, identity_id: &str) -> Result<Option<ProfileRecord>, StoreError> {
        let record = fetch_profile(identity_id).await?;
        self.last_read.replace(record.clone());
        Ok(record)
    }
}
