use super::*;
use crate::net::types::ProfileRecord;

#[test]
fn rename_target_skips_unchanged_name() {
    assert_eq!(rename_target(Some("Mio Akiyama"), "  Mio   Akiyama "), Ok(None));
}

#[test]
fn rename_target_returns_cleaned_new_name() {
    assert_eq!(rename_target(Some("Mio"), " Ritsu  Tainaka"), Ok(Some("Ritsu Tainaka".to_owned())));
    assert_eq!(rename_target(None, "Mio"), Ok(Some("Mio".to_owned())));
}

#[test]
fn rename_target_rejects_invalid_name() {
    assert_eq!(rename_target(Some("Mio"), "x"), Err("Pick a display name of at least 2 characters."));
}

#[test]
fn saved_appearance_reads_back_from_the_stored_record() {
    let saved = theme::appearance("dark", "large", false);
    let record = ProfileRecord {
        id: "u1".to_owned(),
        display_name: "Mio".to_owned(),
        settings: serde_json::to_value(&saved).unwrap(),
        created_at: None,
    };
    assert_eq!(ProfileSettings::from_record(&record), saved);
}
