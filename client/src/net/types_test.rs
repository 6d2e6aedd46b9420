use super::*;

fn record(settings: serde_json::Value) -> ProfileRecord {
    ProfileRecord {
        id: "u1".to_owned(),
        display_name: "Mio".to_owned(),
        settings,
        created_at: None,
    }
}

#[test]
fn identity_parses_me_response() {
    let json = r#"{"id":"7f0c","email":"mio@example.com","email_verified":false,"display_name":null}"#;
    let identity: Identity = serde_json::from_str(json).unwrap();
    assert_eq!(identity.id, "7f0c");
    assert!(!identity.email_verified);
}

#[test]
fn verification_sent_without_code() {
    let sent: VerificationSent = serde_json::from_str(r#"{"ok":true}"#).unwrap();
    assert!(sent.ok);
    assert!(sent.code.is_none());
}

#[test]
fn profile_settings_from_record_reads_known_keys() {
    let settings = ProfileSettings::from_record(&record(serde_json::json!({
        "theme": "dark",
        "font_size": "large",
        "notify_replies": false,
        "palette": ["#000"]
    })));
    assert_eq!(settings.theme, "dark");
    assert_eq!(settings.font_size, "large");
    assert!(!settings.notify_replies);
}

#[test]
fn profile_settings_from_record_defaults_on_garbage() {
    assert_eq!(ProfileSettings::from_record(&record(serde_json::json!("nope"))), ProfileSettings::default());
    assert_eq!(ProfileSettings::from_record(&record(serde_json::Value::Null)), ProfileSettings::default());
}

#[test]
fn create_profile_body_shape() {
    let body = CreateProfile { display_name: "Mio".to_owned(), settings: ProfileSettings::default() };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["display_name"], "Mio");
    assert_eq!(json["settings"]["theme"], "light");
}
