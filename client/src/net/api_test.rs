use super::*;

#[test]
fn user_profile_endpoint_formats_expected_path() {
    assert_eq!(user_profile_endpoint("u123"), "/api/users/u123/profile");
}

#[test]
fn login_failed_message_explains_bad_credentials() {
    assert_eq!(login_failed_message(401), "Incorrect email or password.");
    assert_eq!(login_failed_message(503), "login failed: 503");
}

#[test]
fn register_failed_message_maps_conflict_and_validation() {
    assert_eq!(register_failed_message(409), "That email is already registered.");
    assert!(register_failed_message(400).contains("at least 8 characters"));
    assert_eq!(register_failed_message(500), "register failed: 500");
}

#[test]
fn confirm_code_failed_message_formats_status() {
    assert_eq!(confirm_code_failed_message(400), "That code is expired or incorrect.");
    assert_eq!(confirm_code_failed_message(502), "verify code failed: 502");
}

#[test]
fn create_profile_failed_message_maps_conflict() {
    assert_eq!(create_profile_failed_message(409), "A profile already exists for this account.");
    assert_eq!(create_profile_failed_message(500), "profile setup failed: 500");
}

#[test]
fn reset_failed_message_explains_rejection() {
    assert!(reset_failed_message(400).contains("expired or incorrect"));
    assert_eq!(reset_failed_message(500), "password reset failed: 500");
}

#[test]
fn profile_update_failed_message_maps_statuses() {
    assert_eq!(profile_update_failed_message(400), "Display names are 2 to 40 characters.");
    assert_eq!(profile_update_failed_message(404), "Finish setting up your profile first.");
    assert_eq!(profile_update_failed_message(503), "saving settings failed: 503");
}

#[test]
fn only_unauthorized_means_signed_out() {
    assert_eq!(me_status_outcome(401), Ok(None));
    for status in [403, 500, 502, 503, 504] {
        assert_eq!(me_status_outcome(status), Err(StoreError::Status(status)), "status {status}");
    }
}

#[cfg(not(feature = "hydrate"))]
#[tokio::test]
async fn server_side_profile_store_is_unavailable() {
    let store = HttpProfileStore::default();
    let result = store.get_profile("u1").await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
    assert!(store.take_last_read().is_none());
}

#[cfg(not(feature = "hydrate"))]
#[tokio::test]
async fn server_side_current_user_is_an_error_not_signed_out() {
    assert!(matches!(fetch_current_user().await, Err(StoreError::Unavailable(_))));
}
