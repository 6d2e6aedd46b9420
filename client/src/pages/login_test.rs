use super::*;

#[test]
fn validate_login_input_trims_email() {
    assert_eq!(
        validate_login_input("  mio@example.com  ", "hunter22"),
        Ok(("mio@example.com".to_owned(), "hunter22".to_owned()))
    );
}

#[test]
fn validate_login_input_requires_both_fields() {
    assert_eq!(validate_login_input("   ", "hunter22"), Err("Enter your email and password."));
    assert_eq!(validate_login_input("mio@example.com", ""), Err("Enter your email and password."));
}

#[test]
fn validate_login_input_rejects_address_without_at() {
    assert_eq!(validate_login_input("mio.example.com", "hunter22"), Err("Enter a valid email address."));
}

#[test]
fn validate_login_input_keeps_password_whitespace() {
    assert_eq!(
        validate_login_input("a@b.c", " pass word "),
        Ok(("a@b.c".to_owned(), " pass word ".to_owned()))
    );
}
