//! Verify-email page.
//!
//! SYSTEM CONTEXT
//! ==============
//! Signed-in but unverified users land here. They can mail themselves a new
//! code, confirm it, re-check their status after verifying elsewhere, or sign
//! out. Once the identity reports verified, the step exit moves on.

#[cfg(test)]
#[path = "verify_email_test.rs"]
mod verify_email_test;

use gate::AccessDecision;
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

use crate::state::session::use_session;
use crate::util::auth::install_step_exit;

const CODE_LEN: usize = 6;

/// Uppercase, drop whitespace, cap at the code length.
fn normalize_code_input(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .take(CODE_LEN)
        .collect()
}

pub(crate) fn validate_code_input(raw: &str) -> Result<String, &'static str> {
    let code = normalize_code_input(raw);
    if code.len() != CODE_LEN || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err("Enter the 6-character code from your email.");
    }
    Ok(code)
}

#[component]
pub fn VerifyEmailPage() -> impl IntoView {
    let ctx = use_session();
    install_step_exit(ctx.clone(), AccessDecision::RedirectVerify, use_navigate());

    let code = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);
    let echoed_code = ctx.echoed_code;

    let session = ctx.session;
    let email = move || {
        session
            .get()
            .identity
            .map(|identity| identity.email)
            .unwrap_or_default()
    };

    let on_send = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        info.set("Sending a new code...".to_owned());
        echoed_code.set(None);

        #[cfg(feature = "hydrate")]
        leptos::task::spawn_local(async move {
            match crate::net::api::send_verification_code().await {
                Ok(code_opt) => {
                    echoed_code.set(code_opt);
                    info.set("Code sent. Check your inbox.".to_owned());
                }
                Err(e) => info.set(format!("Could not send code: {e}")),
            }
            busy.set(false);
        });
    };

    let hub = ctx.hub.clone();
    let on_confirm = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        let code_value = match validate_code_input(&code.get()) {
            Ok(value) => value,
            Err(msg) => {
                info.set(msg.to_owned());
                return;
            }
        };
        busy.set(true);
        info.set("Checking code...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let hub = hub.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::confirm_verification_code(&code_value).await {
                    Ok(identity) => {
                        info.set(String::new());
                        echoed_code.set(None);
                        crate::net::identity::adopt_identity(&hub, identity);
                    }
                    Err(e) => info.set(e),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (&hub, code_value);
        }
    };

    let hub_check = ctx.hub.clone();
    let on_check = move |_| {
        if busy.get() {
            return;
        }
        busy.set(true);
        info.set("Checking status...".to_owned());

        #[cfg(feature = "hydrate")]
        {
            let hub = hub_check.clone();
            leptos::task::spawn_local(async move {
                match crate::net::identity::refresh_identity(&hub).await {
                    Ok(Some(identity)) if identity.email_verified => {}
                    Ok(_) => info.set("Still waiting for verification.".to_owned()),
                    Err(e) => info.set(format!("Could not reach the server: {e}")),
                }
                busy.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &hub_check;
        }
    };

    let hub_logout = ctx.hub.clone();
    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let hub = hub_logout.clone();
            leptos::task::spawn_local(async move {
                crate::net::identity::sign_out(&hub).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &hub_logout;
        }
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Verify your email"</h1>
                <p class="login-card__subtitle">"We sent a code to " <strong>{email}</strong></p>
                <form class="login-form" on:submit=on_confirm>
                    <input
                        class="login-input login-input--code"
                        type="text"
                        maxlength="6"
                        placeholder="ABC123"
                        prop:value=move || code.get()
                        on:input=move |ev| code.set(normalize_code_input(&event_target_value(&ev)))
                    />
                    <button class="login-button" type="submit" disabled=move || busy.get()>
                        "Confirm"
                    </button>
                </form>
                <button class="login-button login-button--secondary" on:click=on_send disabled=move || busy.get()>
                    "Send a new code"
                </button>
                <button class="login-button login-button--secondary" on:click=on_check disabled=move || busy.get()>
                    "I've verified, check again"
                </button>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
                <Show when=move || echoed_code.get().is_some()>
                    <p class="login-message login-message--code">
                        "Code: "
                        <span>{move || echoed_code.get().unwrap_or_default()}</span>
                    </p>
                </Show>
                <div class="login-divider"></div>
                <button class="login-link" on:click=on_logout>"Sign out"</button>
            </div>
        </div>
    }
}
