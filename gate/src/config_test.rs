use super::*;

#[test]
fn defaults_match_app_routes() {
    let config = GateConfig::default();
    assert_eq!(config.routes.login, "/login");
    assert_eq!(config.routes.verify, "/verify-email");
    assert_eq!(config.routes.provision, "/setup");
    assert_eq!(config.routes.home, "/");
    assert_eq!(config.provider_timeout(), Some(Duration::from_secs(10)));
}

#[test]
fn partial_json_keeps_defaults() {
    let config = serde_json::from_str::<GateConfig>(r#"{"routes":{"provision":"/usermake"}}"#).unwrap();
    assert_eq!(config.routes.provision, "/usermake");
    assert_eq!(config.routes.login, "/login");
    assert_eq!(config.provider_timeout_ms, Some(DEFAULT_PROVIDER_TIMEOUT_MS));
}

#[test]
fn null_timeout_waits_forever() {
    let config = serde_json::from_str::<GateConfig>(r#"{"provider_timeout_ms":null}"#).unwrap();
    assert_eq!(config.provider_timeout(), None);
}

#[test]
fn zero_timeout_is_disabled() {
    let config = GateConfig { provider_timeout_ms: Some(0), ..GateConfig::default() };
    assert_eq!(config.provider_timeout(), None);
}

#[test]
fn malformed_json_is_an_error() {
    assert!(serde_json::from_str::<GateConfig>("{routes:").is_err());
}

#[test]
fn gate_pages_are_recognised() {
    let routes = GuardRoutes::default();
    assert!(routes.is_gate_page("/login"));
    assert!(routes.is_gate_page("/verify-email"));
    assert!(routes.is_gate_page("/setup"));
    assert!(!routes.is_gate_page("/bookshelf"));
    assert!(!routes.is_gate_page("/"));
}
