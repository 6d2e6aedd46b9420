use super::*;

#[test]
fn validation_errors_are_bad_request() {
    assert_eq!(
        profile_error_to_status(ProfileError::InvalidDisplayName("too short")),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(profile_error_to_status(ProfileError::InvalidSettings), StatusCode::BAD_REQUEST);
}

#[test]
fn second_create_is_conflict() {
    assert_eq!(profile_error_to_status(ProfileError::Conflict(Uuid::nil())), StatusCode::CONFLICT);
}

#[test]
fn missing_profile_is_not_found() {
    assert_eq!(profile_error_to_status(ProfileError::NotFound(Uuid::nil())), StatusCode::NOT_FOUND);
}

#[test]
fn database_failure_is_internal() {
    assert_eq!(
        profile_error_to_status(ProfileError::Db(sqlx::Error::PoolTimedOut)),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[test]
fn create_body_defaults_settings_to_null() {
    let body: CreateProfileBody = serde_json::from_str(r#"{"display_name":"Mio"}"#).unwrap();
    assert_eq!(body.display_name, "Mio");
    assert!(body.settings.is_null());
}
