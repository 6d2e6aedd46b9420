use super::*;

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn account_errors_map_to_client_statuses() {
    assert_eq!(account_error_to_status(AccountError::InvalidEmail), StatusCode::BAD_REQUEST);
    assert_eq!(account_error_to_status(AccountError::WeakPassword), StatusCode::BAD_REQUEST);
    assert_eq!(account_error_to_status(AccountError::EmailTaken), StatusCode::CONFLICT);
    assert_eq!(account_error_to_status(AccountError::InvalidCredentials), StatusCode::UNAUTHORIZED);
    assert_eq!(account_error_to_status(AccountError::InvalidResetCode), StatusCode::BAD_REQUEST);
}

#[test]
fn google_errors_map_to_statuses() {
    assert_eq!(google_error_to_status(&GoogleError::UnverifiedEmail), StatusCode::FORBIDDEN);
    assert_eq!(google_error_to_status(&GoogleError::AlreadyLinked), StatusCode::CONFLICT);
    assert_eq!(google_error_to_status(&GoogleError::TokenExchange("x".to_owned())), StatusCode::BAD_GATEWAY);
    assert_eq!(google_error_to_status(&GoogleError::UserInfo("x".to_owned())), StatusCode::BAD_GATEWAY);
    assert_eq!(
        google_error_to_status(&GoogleError::Db(sqlx::Error::RowNotFound)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn account_internal_errors_are_500() {
    assert_eq!(
        account_error_to_status(AccountError::Hash("bad".to_owned())),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        account_error_to_status(AccountError::Db(sqlx::Error::RowNotFound)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn verification_errors_map_to_statuses() {
    assert_eq!(verification_error_to_status(VerificationError::InvalidCode), StatusCode::BAD_REQUEST);
    assert_eq!(verification_error_to_status(VerificationError::VerificationFailed), StatusCode::BAD_REQUEST);
    assert_eq!(
        verification_error_to_status(VerificationError::EmailDelivery("down".to_owned())),
        StatusCode::BAD_GATEWAY
    );
    assert_eq!(
        verification_error_to_status(VerificationError::Db(sqlx::Error::RowNotFound)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

// =============================================================================
// cookies
// =============================================================================

#[test]
fn session_cookie_is_http_only_lax() {
    let cookie = session_cookie("abc".to_owned(), true);
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.value(), "abc");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.secure(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.max_age(), Some(Duration::days(SESSION_DAYS)));
}

#[test]
fn oauth_cookies_are_short_lived() {
    let cookie = oauth_cookie(OAUTH_STATE_COOKIE, "st".to_owned(), false);
    assert_eq!(cookie.max_age(), Some(Duration::minutes(OAUTH_COOKIE_MINUTES)));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(expired_cookie(OAUTH_NEXT_COOKIE, false).max_age(), Some(Duration::ZERO));
}

#[test]
fn cleared_cookie_expires_immediately() {
    let cookie = cleared_cookie(false);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    assert_eq!(cookie.secure(), Some(false));
}

// =============================================================================
// bodies
// =============================================================================

#[test]
fn verification_sent_omits_code_when_not_echoing() {
    let json = serde_json::to_value(VerificationSent { ok: true, code: None }).unwrap();
    assert_eq!(json, serde_json::json!({"ok": true}));
}

#[test]
fn verification_sent_includes_echoed_code() {
    let json = serde_json::to_value(VerificationSent { ok: true, code: Some("ABC234".to_owned()) }).unwrap();
    assert_eq!(json["code"], "ABC234");
}

fn user() -> SessionUser {
    SessionUser {
        id: uuid::Uuid::nil(),
        email: "mio@example.com".to_owned(),
        email_verified: false,
        display_name: None,
    }
}

#[test]
fn registered_flattens_identity_and_echoes_code() {
    let json = serde_json::to_value(Registered { user: user(), verification_code: Some("ABC234".to_owned()) }).unwrap();
    assert_eq!(json["email"], "mio@example.com");
    assert_eq!(json["email_verified"], false);
    assert_eq!(json["verification_code"], "ABC234");
}

#[test]
fn registered_without_echo_is_plain_identity() {
    let json = serde_json::to_value(Registered { user: user(), verification_code: None }).unwrap();
    assert!(json.get("verification_code").is_none());
    assert_eq!(json, serde_json::to_value(user()).unwrap());
}

// =============================================================================
// safe_next
// =============================================================================

#[test]
fn safe_next_keeps_local_paths() {
    assert_eq!(safe_next(Some("/bookshelf")), "/bookshelf");
    assert_eq!(safe_next(Some("/bookshelf?shelf=2#top")), "/bookshelf?shelf=2#top");
}

#[test]
fn safe_next_rejects_offsite_targets() {
    assert_eq!(safe_next(None), "/");
    assert_eq!(safe_next(Some("")), "/");
    assert_eq!(safe_next(Some("https://evil.example")), "/");
    assert_eq!(safe_next(Some("//evil.example")), "/");
    assert_eq!(safe_next(Some("/\\evil.example")), "/");
}
