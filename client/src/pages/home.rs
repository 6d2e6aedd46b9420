//! Home page for signed-in, verified, provisioned readers.

use leptos::prelude::*;

use crate::state::session::use_session;

#[component]
pub fn HomePage() -> impl IntoView {
    let ctx = use_session();
    let session = ctx.session;
    let greeting = move || {
        session
            .get()
            .identity
            .map(|identity| format!("Welcome back, {}.", identity.label()))
            .unwrap_or_default()
    };

    let hub = ctx.hub.clone();
    let on_logout = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let hub = hub.clone();
            leptos::task::spawn_local(async move {
                crate::net::identity::sign_out(&hub).await;
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = &hub;
        }
    };

    view! {
        <div class="home-page">
            <header class="home-page__header">
                <h1>"Bookclub"</h1>
                <button class="login-link" on:click=on_logout>"Sign out"</button>
            </header>
            <p class="home-page__greeting">{greeting}</p>
            <nav class="home-page__nav">
                <a href="/bookshelf">"My bookshelf"</a>
                <a href="/settings">"Settings"</a>
            </nav>
        </div>
    }
}
