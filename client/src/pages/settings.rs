//! Account settings page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected route. Edits the profile the setup step created: display name
//! through `PATCH /api/users/profile`, appearance and notifications through
//! `PATCH /api/users/profile/settings`. Appearance changes preview live on
//! the document and are only remembered locally once the server keeps them.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use leptos::prelude::*;

#[cfg(any(test, feature = "hydrate"))]
use crate::net::types::ProfileSettings;
use crate::pages::setup_user::validate_display_name;
use crate::state::session::use_session;
use crate::util::theme;

/// The cleaned new name, or `None` when it matches the current one.
fn rename_target(current: Option<&str>, input: &str) -> Result<Option<String>, &'static str> {
    let name = validate_display_name(input)?;
    if current.is_some_and(|c| c == name) {
        return Ok(None);
    }
    Ok(Some(name))
}

#[component]
pub fn SettingsPage() -> impl IntoView {
    let ctx = use_session();
    let session = ctx.session;

    let initial = theme::read_preference();
    let display_name = RwSignal::new(
        session
            .get_untracked()
            .identity
            .and_then(|identity| identity.display_name)
            .unwrap_or_default(),
    );
    let theme_choice = RwSignal::new(initial.theme);
    let font_size = RwSignal::new(initial.font_size);
    let notify_replies = RwSignal::new(initial.notify_replies);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let preview = move || theme::appearance(&theme_choice.get(), &font_size.get(), notify_replies.get());
    Effect::new(move || theme::apply(&preview()));
    on_cleanup(|| theme::apply(&theme::read_preference()));

    #[cfg(feature = "hydrate")]
    if let Some(identity) = session.get_untracked().identity {
        leptos::task::spawn_local(async move {
            match crate::net::api::fetch_profile(&identity.id).await {
                Ok(Some(record)) => {
                    let stored = ProfileSettings::from_record(&record);
                    display_name.set(record.display_name);
                    theme_choice.set(stored.theme);
                    font_size.set(stored.font_size);
                    notify_replies.set(stored.notify_replies);
                }
                Ok(None) => {}
                Err(e) => log::warn!("settings page could not read profile: {e}"),
            }
        });
    }

    let on_toggle = move |_| theme_choice.update(|t| *t = theme::toggle_theme(t).to_owned());

    let save_ctx = ctx.clone();
    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let current = session.get_untracked().identity.and_then(|identity| identity.display_name);
        let rename = match rename_target(current.as_deref(), &display_name.get()) {
            Ok(rename) => rename,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        let settings = preview();
        busy.set(true);
        info.set("Saving...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let ctx = save_ctx.clone();
            leptos::task::spawn_local(async move {
                if let Some(name) = rename {
                    if let Err(e) = crate::net::api::rename_profile(&name).await {
                        info.set(e);
                        busy.set(false);
                        return;
                    }
                    let _ = crate::net::identity::refresh_identity(&ctx.hub).await;
                }
                match crate::net::api::update_settings(&settings).await {
                    Ok(record) => {
                        theme::persist(&ProfileSettings::from_record(&record));
                        ctx.refresh_profile();
                        info.set("Saved.".to_owned());
                    }
                    Err(e) => info.set(e),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&save_ctx, rename, settings);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Settings"</h1>
                <form class="login-form" on:submit=on_save>
                    <input
                        class="login-input"
                        type="text"
                        maxlength="40"
                        placeholder="Display name"
                        prop:value=move || display_name.get()
                        on:input=move |ev| display_name.set(event_target_value(&ev))
                    />
                    <label class="setup-field">
                        "Theme"
                        <select
                            prop:value=move || theme_choice.get()
                            on:change=move |ev| theme_choice.set(event_target_value(&ev))
                        >
                            {theme::THEMES
                                .iter()
                                .map(|t| view! { <option value=*t>{*t}</option> })
                                .collect_view()}
                        </select>
                        <button class="login-link" type="button" on:click=on_toggle>"Switch"</button>
                    </label>
                    <label class="setup-field">
                        "Text size"
                        <select
                            prop:value=move || font_size.get()
                            on:change=move |ev| font_size.set(event_target_value(&ev))
                        >
                            {theme::FONT_SIZES
                                .iter()
                                .map(|s| view! { <option value=*s>{*s}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <label class="setup-field setup-field--inline">
                        <input
                            type="checkbox"
                            prop:checked=move || notify_replies.get()
                            on:change=move |ev| notify_replies.set(event_target_checked(&ev))
                        />
                        "Notify me about replies"
                    </label>
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Save"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <a class="login-link" href="/password-reset">"Change password"</a>
                <a class="login-link" href="/">"Back"</a>
            </div>
        </div>
    }
}
