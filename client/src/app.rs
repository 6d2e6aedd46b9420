//! Root component, route table and SSR shell.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server renders `shell` for every app route; the browser hydrates the
//! same tree. `App` creates the session context before the router so every
//! route, guarded or not, sees one session store.

use gate::GateConfig;
use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::components::{Route, Router, Routes};
use leptos_router::path;

use crate::components::protected_route::ProtectedRoute;
use crate::pages::bookshelf::BookshelfPage;
use crate::pages::home::HomePage;
use crate::pages::login::LoginPage;
use crate::pages::password_reset::PasswordResetPage;
use crate::pages::register::RegisterPage;
use crate::pages::settings::SettingsPage;
use crate::pages::setup_user::SetupUserPage;
use crate::pages::verify_email::VerifyEmailPage;
use crate::state::session::provide_session;
use crate::util::theme;

/// HTML document wrapper used by server-side rendering.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();
    provide_session(GateConfig::default());

    Effect::new(move || theme::apply(&theme::read_preference()));

    view! {
        <Stylesheet id="leptos" href="/pkg/bookclub.css"/>
        <Title text="Bookclub"/>
        <Router>
            <main>
                <Routes fallback=|| "Page not found.">
                    <Route path=path!("/login") view=LoginPage/>
                    <Route path=path!("/register") view=RegisterPage/>
                    <Route path=path!("/verify-email") view=VerifyEmailPage/>
                    <Route path=path!("/setup") view=SetupUserPage/>
                    <Route path=path!("/password-reset") view=PasswordResetPage/>
                    <Route
                        path=path!("/")
                        view=|| view! { <ProtectedRoute><HomePage/></ProtectedRoute> }
                    />
                    <Route
                        path=path!("/bookshelf")
                        view=|| view! { <ProtectedRoute><BookshelfPage/></ProtectedRoute> }
                    />
                    <Route
                        path=path!("/settings")
                        view=|| view! { <ProtectedRoute><SettingsPage/></ProtectedRoute> }
                    />
                </Routes>
            </main>
        </Router>
    }
}
