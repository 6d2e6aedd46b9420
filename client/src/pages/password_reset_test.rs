use super::*;

#[test]
fn validate_reset_email_trims() {
    assert_eq!(validate_reset_email("  mio@example.com "), Ok("mio@example.com".to_owned()));
}

#[test]
fn validate_reset_email_rejects_missing_at() {
    assert_eq!(validate_reset_email("mio.example.com"), Err("Enter a valid email address."));
    assert_eq!(validate_reset_email("   "), Err("Enter a valid email address."));
}

#[test]
fn validate_reset_input_normalizes_code() {
    assert_eq!(
        validate_reset_input("mio@example.com", " k7p2qx ", "hunter22", "hunter22"),
        Ok(("mio@example.com".to_owned(), "K7P2QX".to_owned(), "hunter22".to_owned()))
    );
}

#[test]
fn validate_reset_input_rejects_bad_code() {
    assert_eq!(
        validate_reset_input("mio@example.com", "k7p", "hunter22", "hunter22"),
        Err("Enter the 6-character code from your email.")
    );
}

#[test]
fn validate_reset_input_checks_password_rules() {
    assert_eq!(
        validate_reset_input("mio@example.com", "K7P2QX", "short", "short"),
        Err("Passwords need at least 8 characters.")
    );
    assert_eq!(
        validate_reset_input("mio@example.com", "K7P2QX", "hunter22", "hunter23"),
        Err("Passwords do not match.")
    );
}
