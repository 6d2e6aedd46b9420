//! Password reset page.
//!
//! Public route, reachable signed in or out. The first step mails a reset
//! code; the second sets a new password with it. The server ends every
//! session of the account on success, so the page refreshes the identity
//! (now signed out) and sends the user to sign in again.

#[cfg(test)]
#[path = "password_reset_test.rs"]
mod password_reset_test;

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::pages::register::validate_new_password;
use crate::pages::verify_email::validate_code_input;
use crate::state::session::use_session;

fn validate_reset_email(raw: &str) -> Result<String, &'static str> {
    let email = raw.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    Ok(email.to_owned())
}

/// Checks the second step and returns `(email, code, password)`.
fn validate_reset_input(
    email: &str,
    code: &str,
    password: &str,
    confirm: &str,
) -> Result<(String, String, String), &'static str> {
    let email = validate_reset_email(email)?;
    let code = validate_code_input(code)?;
    validate_new_password(password, confirm)?;
    Ok((email, code, password.to_owned()))
}

#[component]
pub fn PasswordResetPage() -> impl IntoView {
    let ctx = use_session();
    let navigate = use_navigate();

    let email = RwSignal::new(
        ctx.session
            .get_untracked()
            .identity
            .map(|identity| identity.email)
            .unwrap_or_default(),
    );
    let code = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let code_sent = RwSignal::new(false);
    let echoed_code = RwSignal::new(None::<String>);
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_request = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let email_value = match validate_reset_email(&email.get()) {
            Ok(value) => value,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Sending a reset code...".to_owned());

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::request_password_reset(&email_value).await {
                Ok(code_opt) => {
                    echoed_code.set(code_opt);
                    code_sent.set(true);
                    info.set("If that address has an account, a code is on its way.".to_owned());
                }
                Err(e) => info.set(e),
            }
            busy.set(false);
        });
        #[cfg(not(feature = "hydrate"))]
        let _ = email_value;
    };

    let hub = ctx.hub.clone();
    let on_reset = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, code_value, password_value) =
            match validate_reset_input(&email.get(), &code.get(), &password.get(), &confirm.get()) {
                Ok(values) => values,
                Err(msg) => {
                    info.set(msg.to_owned());
                    return;
                }
            };
        busy.set(true);
        info.set("Updating password...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let hub = hub.clone();
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::reset_password(&email_value, &code_value, &password_value).await {
                    Ok(()) => {
                        password.set(String::new());
                        confirm.set(String::new());
                        let _ = crate::net::identity::refresh_identity(&hub).await;
                        navigate("/login", leptos_router::NavigateOptions::default());
                    }
                    Err(e) => info.set(e),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&hub, &navigate, email_value, code_value, password_value);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Reset password"</h1>
                <form class="login-form" on:submit=on_request prop:hidden=move || code_sent.get()>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Send Code"
                    </button>
                </form>
                <form class="login-form" on:submit=on_reset prop:hidden=move || !code_sent.get()>
                    <input
                        class="login-input"
                        type="text"
                        maxlength="6"
                        placeholder="ABC123"
                        prop:value=move || code.get()
                        on:input=move |ev| code.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="New password (8+ characters)"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Repeat new password"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Set Password"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <Show when=move || echoed_code.get().is_some()>
                    <p class="login-message">
                        "Development code: " <code>{move || echoed_code.get().unwrap_or_default()}</code>
                    </p>
                </Show>
                <div class="login-divider"></div>
                <a class="login-link" href="/login">"Back to sign in"</a>
            </div>
        </div>
    }
}
