use super::*;

#[tokio::test]
async fn clones_share_config() {
    let state = test_helpers::test_app_state();
    let clone = state.clone();
    assert!(Arc::ptr_eq(&state.config, &clone.config));
}

#[test]
fn test_config_echoes_codes_without_delivery() {
    let config = test_helpers::test_config();
    assert!(config.email_code_echo);
    assert!(config.email.is_none());
    assert!(!config.cookie_secure);
}
