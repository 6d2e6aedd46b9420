use std::collections::HashMap;

use super::*;

fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect();
    move |key: &str| map.get(key).cloned()
}

// =============================================================================
// parse_bool
// =============================================================================

#[test]
fn parse_bool_true_and_false_variants() {
    for val in ["1", "true", "yes", "on", "TRUE", " On "] {
        assert_eq!(parse_bool(val), Some(true), "expected true for {val:?}");
    }
    for val in ["0", "false", "no", "off", "False"] {
        assert_eq!(parse_bool(val), Some(false), "expected false for {val:?}");
    }
}

#[test]
fn parse_bool_invalid_returns_none() {
    assert_eq!(parse_bool("maybe"), None);
    assert_eq!(parse_bool(""), None);
}

// =============================================================================
// ServerConfig::from_lookup
// =============================================================================

#[test]
fn database_url_is_required() {
    assert_eq!(ServerConfig::from_lookup(lookup(&[])), Err(ConfigError::Missing("DATABASE_URL")));
    assert_eq!(
        ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "  ")])),
        Err(ConfigError::Missing("DATABASE_URL"))
    );
}

#[test]
fn defaults_apply_when_only_database_url_set() {
    let config = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x")])).unwrap();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert!(!config.cookie_secure);
    assert!(!config.email_code_echo);
    assert!(config.email.is_none());
    assert!(config.google.is_none());
}

#[test]
fn explicit_values_are_parsed() {
    let config = ServerConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://x"),
        ("PORT", "8080"),
        ("DB_MAX_CONNECTIONS", "12"),
        ("COOKIE_SECURE", "true"),
        ("EMAIL_CODE_ECHO", "1"),
        ("RESEND_API_KEY", "re_123"),
        ("RESEND_FROM", "club@example.com"),
    ]))
    .unwrap();
    assert_eq!(config.port, 8080);
    assert_eq!(config.db_max_connections, 12);
    assert!(config.cookie_secure);
    assert!(config.email_code_echo);
    assert_eq!(
        config.email,
        Some(EmailDelivery { api_key: "re_123".to_owned(), from: "club@example.com".to_owned() })
    );
}

#[test]
fn invalid_port_is_reported() {
    let err = ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"), ("PORT", "eighty")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "PORT", value: "eighty".to_owned() });
}

#[test]
fn invalid_bool_is_reported() {
    let err =
        ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"), ("COOKIE_SECURE", "sometimes")])).unwrap_err();
    assert_eq!(err, ConfigError::Invalid { key: "COOKIE_SECURE", value: "sometimes".to_owned() });
}

#[test]
fn email_delivery_needs_both_key_and_sender() {
    let config =
        ServerConfig::from_lookup(lookup(&[("DATABASE_URL", "postgres://x"), ("RESEND_API_KEY", "re_123")])).unwrap();
    assert!(config.email.is_none());
}

#[test]
fn email_delivery_debug_redacts_key() {
    let delivery = EmailDelivery { api_key: "re_secret".to_owned(), from: "club@example.com".to_owned() };
    let debug = format!("{delivery:?}");
    assert!(!debug.contains("re_secret"));
    assert!(debug.contains("club@example.com"));
}

#[test]
fn google_sign_in_needs_all_three_values() {
    let partial = ServerConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://x"),
        ("GOOGLE_CLIENT_ID", "cid"),
        ("GOOGLE_CLIENT_SECRET", "shh"),
    ]))
    .unwrap();
    assert!(partial.google.is_none());

    let full = ServerConfig::from_lookup(lookup(&[
        ("DATABASE_URL", "postgres://x"),
        ("GOOGLE_CLIENT_ID", "cid"),
        ("GOOGLE_CLIENT_SECRET", "shh"),
        ("GOOGLE_REDIRECT_URI", "http://localhost:3000/auth/google/callback"),
    ]))
    .unwrap();
    let google = full.google.unwrap();
    assert_eq!(google.client_id, "cid");
    assert_eq!(google.redirect_uri, "http://localhost:3000/auth/google/callback");
}

#[test]
fn google_debug_redacts_secret() {
    let google = GoogleOAuth {
        client_id: "cid".to_owned(),
        client_secret: "shh-secret".to_owned(),
        redirect_uri: "http://localhost/cb".to_owned(),
    };
    let debug = format!("{google:?}");
    assert!(!debug.contains("shh-secret"));
    assert!(debug.contains("cid"));
}
