use super::*;

#[test]
fn normalize_theme_accepts_dark_case_insensitively() {
    assert_eq!(normalize_theme("Dark"), "dark");
    assert_eq!(normalize_theme(" dark "), "dark");
}

#[test]
fn normalize_theme_defaults_to_light() {
    assert_eq!(normalize_theme("sepia"), "light");
    assert_eq!(normalize_theme(""), "light");
}

#[test]
fn normalize_font_size_keeps_known_sizes() {
    for size in FONT_SIZES {
        assert_eq!(normalize_font_size(size), size);
    }
    assert_eq!(normalize_font_size("LARGE"), "large");
}

#[test]
fn normalize_font_size_defaults_to_medium() {
    assert_eq!(normalize_font_size("huge"), "medium");
}

#[test]
fn appearance_clamps_unknown_values() {
    assert_eq!(
        appearance("Dark", "HUGE", false),
        ProfileSettings { theme: "dark".to_owned(), font_size: "medium".to_owned(), notify_replies: false }
    );
    assert_eq!(appearance("light", "small", true).font_size, "small");
}

#[test]
fn toggle_theme_flips() {
    assert_eq!(toggle_theme("light"), "dark");
    assert_eq!(toggle_theme("dark"), "light");
    assert_eq!(toggle_theme("unknown"), "dark");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn read_preference_is_default_without_browser() {
    assert_eq!(read_preference(), ProfileSettings::default());
}

#[test]
fn apply_and_persist_are_callable() {
    let settings = ProfileSettings::default();
    apply(&settings);
    persist(&settings);
}
