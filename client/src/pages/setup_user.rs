//! Account provisioning page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Verified users without a profile record land here. Submitting creates the
//! profile once, records it in the resolver cache so guards allow at once,
//! and stores the chosen appearance in the profile settings.

#[cfg(test)]
#[path = "setup_user_test.rs"]
mod setup_user_test;

use gate::AccessDecision;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::net::types::{CreateProfile, ProfileSettings};
use crate::state::session::use_session;
use crate::util::auth::install_step_exit;
use crate::util::theme;

const MIN_NAME_LEN: usize = 2;
const MAX_NAME_LEN: usize = 40;

/// Trim and collapse inner runs of whitespace, then check the length.
pub(crate) fn validate_display_name(raw: &str) -> Result<String, &'static str> {
    let name = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let len = name.chars().count();
    if len < MIN_NAME_LEN {
        return Err("Pick a display name of at least 2 characters.");
    }
    if len > MAX_NAME_LEN {
        return Err("Display names are limited to 40 characters.");
    }
    Ok(name)
}

fn build_profile(display_name: String, theme_choice: &str, font_size: &str, notify_replies: bool) -> CreateProfile {
    CreateProfile { display_name, settings: theme::appearance(theme_choice, font_size, notify_replies) }
}

#[component]
pub fn SetupUserPage() -> impl IntoView {
    let ctx = use_session();
    install_step_exit(ctx.clone(), AccessDecision::RedirectProvision, use_navigate());

    let initial = theme::read_preference();
    let display_name = RwSignal::new(
        ctx.session
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

    Effect::new(move || {
        theme::apply(&ProfileSettings {
            theme: theme_choice.get(),
            font_size: font_size.get(),
            notify_replies: notify_replies.get_untracked(),
        });
    });

    let submit_ctx = ctx.clone();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let name = match validate_display_name(&display_name.get()) {
            Ok(name) => name,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        let body = build_profile(name, &theme_choice.get(), &font_size.get(), notify_replies.get());
        busy.set(true);
        info.set("Setting up your account...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let ctx = submit_ctx.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::create_profile(&body).await {
                    Ok(record) => {
                        theme::persist(&body.settings);
                        info.set(String::new());
                        ctx.mark_provisioned(&record.id);
                    }
                    Err(e) => {
                        info.set(e);
                        // A conflict means the profile is already there; re-read it.
                        ctx.refresh_profile();
                    }
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&submit_ctx, body);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Set up your account"</h1>
                <form class="login-form" on:submit=on_submit>
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
                        "Continue"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
