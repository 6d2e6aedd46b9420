//! Theme and font-size preference.
//!
//! Reads the user's choice from `localStorage` and applies `data-theme` and
//! `data-font-size` attributes to the `<html>` element. The same values are
//! written into the profile settings blob when the account is provisioned.
//! Requires a browser environment.
//!
//! TRADE-OFFS
//! ==========
//! Preference persistence is best-effort browser-only behavior; SSR paths
//! safely no-op to keep server rendering deterministic.

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

use crate::net::types::ProfileSettings;

#[cfg(feature = "hydrate")]
const THEME_KEY: &str = "bookclub_theme";
#[cfg(feature = "hydrate")]
const FONT_SIZE_KEY: &str = "bookclub_font_size";

pub const THEMES: [&str; 2] = ["light", "dark"];
pub const FONT_SIZES: [&str; 3] = ["small", "medium", "large"];

/// Clamp an arbitrary theme string to a known theme.
pub fn normalize_theme(raw: &str) -> &'static str {
    if raw.trim().eq_ignore_ascii_case("dark") { "dark" } else { "light" }
}

/// Clamp an arbitrary font-size string to a known size, defaulting to medium.
pub fn normalize_font_size(raw: &str) -> &'static str {
    let raw = raw.trim();
    FONT_SIZES
        .iter()
        .find(|size| size.eq_ignore_ascii_case(raw))
        .copied()
        .unwrap_or("medium")
}

/// Appearance settings with theme and font size clamped to known values.
pub fn appearance(theme: &str, font_size: &str, notify_replies: bool) -> ProfileSettings {
    ProfileSettings {
        theme: normalize_theme(theme).to_owned(),
        font_size: normalize_font_size(font_size).to_owned(),
        notify_replies,
    }
}

/// Read the stored preference, falling back to the system color scheme.
pub fn read_preference() -> ProfileSettings {
    #[cfg(feature = "hydrate")]
    {
        let mut settings = ProfileSettings::default();
        let Some(window) = web_sys::window() else {
            return settings;
        };
        let storage = window.local_storage().ok().flatten();
        let stored = |key: &str| storage.as_ref().and_then(|s| s.get_item(key).ok().flatten());

        match stored(THEME_KEY) {
            Some(theme) => normalize_theme(&theme).clone_into(&mut settings.theme),
            None => {
                let prefers_dark = window
                    .match_media("(prefers-color-scheme: dark)")
                    .ok()
                    .flatten()
                    .map_or(false, |mq| mq.matches());
                if prefers_dark {
                    "dark".clone_into(&mut settings.theme);
                }
            }
        }
        if let Some(size) = stored(FONT_SIZE_KEY) {
            normalize_font_size(&size).clone_into(&mut settings.font_size);
        }
        settings
    }
    #[cfg(not(feature = "hydrate"))]
    {
        ProfileSettings::default()
    }
}

/// Apply theme and font size to the `<html>` element.
pub fn apply(settings: &ProfileSettings) {
    #[cfg(feature = "hydrate")]
    {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|doc| doc.document_element())
        {
            let _ = el.set_attribute("data-theme", normalize_theme(&settings.theme));
            let _ = el.set_attribute("data-font-size", normalize_font_size(&settings.font_size));
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = settings;
    }
}

/// Apply and remember the preference.
pub fn persist(settings: &ProfileSettings) {
    apply(settings);
    #[cfg(feature = "hydrate")]
    {
        if let Some(Ok(Some(storage))) = web_sys::window().map(|w| w.local_storage()) {
            let _ = storage.set_item(THEME_KEY, normalize_theme(&settings.theme));
            let _ = storage.set_item(FONT_SIZE_KEY, normalize_font_size(&settings.font_size));
        }
    }
}

/// The other theme.
pub fn toggle_theme(current: &str) -> &'static str {
    if normalize_theme(current) == "dark" { "light" } else { "dark" }
}
