//! Login page: email + password sign-in.
//!
//! SYSTEM CONTEXT
//! ==============
//! Guards send signed-out users here with the page they wanted stashed as the
//! navigation intent. A successful sign-in publishes the identity; the step
//! exit then forwards to verification or provisioning, or returns the user
//! to the intent once every gate passes.
//!
//! Google sign-in leaves the app: the server runs the OAuth round trip and
//! redirects back to the intended page with the session cookie set, so the
//! intent travels as the `next` query parameter instead of through the slot.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use gate::AccessDecision;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::session::use_session;
use crate::util::auth::install_step_exit;

fn validate_login_input(email: &str, password: &str) -> Result<(String, String), &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err("Enter your email and password.");
    }
    if !email.contains('@') {
        return Err("Enter a valid email address.");
    }
    Ok((email.to_owned(), password.to_owned()))
}

/// Server route that starts Google sign-in, returning to `next` afterwards.
#[cfg(feature = "hydrate")]
fn google_start_href(next: &str) -> Option<String> {
    let params = web_sys::UrlSearchParams::new().ok()?;
    params.append("next", next);
    Some(format!("/auth/google?{}", params.to_string().as_string()?))
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let ctx = use_session();
    install_step_exit(ctx.clone(), AccessDecision::RedirectLogin, use_navigate());

    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let hub = ctx.hub.clone();
    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let (email_value, password_value) = match validate_login_input(&email.get(), &password.get()) {
            Ok(values) => values,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Signing in...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let hub = hub.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::login(&email_value, &password_value).await {
                    Ok(identity) => {
                        password.set(String::new());
                        info.set(String::new());
                        crate::net::identity::adopt_identity(&hub, identity);
                    }
                    Err(e) => info.set(e),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&hub, email_value, password_value);
        }
    };

    let google_ctx = ctx.clone();
    let on_google = move |_| {
        let next = gate::intent::return_path(google_ctx.intents.peek().as_ref(), google_ctx.guard.routes());
        #[cfg(feature = "hydrate")]
        {
            let href = google_start_href(&next).unwrap_or_else(|| "/auth/google".to_owned());
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.location().set_href(&href) {
                    log::warn!("could not start google sign-in: {e:?}");
                }
            }
        }
        #[cfg(not(feature = "hydrate"))]
        let _ = next;
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Bookclub"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
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
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Sign In"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <button class="login-button login-button--google" type="button" on:click=on_google>
                    "Continue with Google"
                </button>
                <div class="login-divider"></div>
                <a class="login-link" href="/password-reset">"Forgot password?"</a>
                <a class="login-link" href="/register">"Create an account"</a>
            </div>
        </div>
    }
}
