//! Registration page.
//!
//! New accounts start unverified; the server mails a code and the step exit
//! forwards the user to the verify-email page.

#[cfg(test)]
#[path = "register_test.rs"]
mod register_test;

use gate::AccessDecision;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::session::use_session;
use crate::util::auth::install_step_exit;

const MIN_PASSWORD_LEN: usize = 8;

/// Shared by registration and password reset.
pub(crate) fn validate_new_password(password: &str, confirm: &str) -> Result<(), &'static str> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err("Passwords need at least 8 characters.");
    }
    if password != confirm {
        return Err("Passwords do not match.");
    }
    Ok(())
}

fn validate_register_input(email: &str, password: &str, confirm: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    validate_new_password(password, confirm)?;
    Ok((email.to_owned(), password.to_owned()))
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let ctx = use_session();
    install_step_exit(ctx.clone(), AccessDecision::RedirectLogin, use_navigate());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let hub = ctx.hub.clone();
    let echoed_code = ctx.echoed_code;
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) =
            match validate_register_input(&email.get(), &password.get(), &confirm.get()) {
                Ok(values) => values,
                Err(msg) => {
                    info.set(msg.to_owned());
                    return;
                }
            };
        busy.set(true);
        info.set("Creating account...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let hub = hub.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::register(&email_value, &password_value).await {
                    Ok(registered) => {
                        info.set(String::new());
                        echoed_code.set(registered.verification_code);
                        crate::net::identity::adopt_identity(&hub, registered.identity);
                    }
                    Err(e) => info.set(e),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&hub, echoed_code, email_value, password_value);
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Join Bookclub"</h1>
                <form class="login-form" on:submit=on_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password (8+ characters)"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Repeat password"
                        prop:value=move || confirm.get()
                        on:input=move |ev| confirm.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Create Account"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <div class="login-divider"></div>
                <a class="login-link" href="/login">"Already have an account? Sign in"</a>
            </div>
        </div>
    }
}
