//! Route guard wrapper for protected pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected route renders through `ProtectedRoute`. It re-derives the
//! access decision whenever the session or profile cache changes, renders the
//! page only on `Allow`, shows a neutral placeholder while suspended, and
//! hands redirects to the router with the current location as the intent.

#[cfg(test)]
#[path = "protected_route_test.rs"]
mod protected_route_test;

use gate::{AccessDecision, IntentSlot, Location, Navigator, RedirectOptions};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::{use_location, use_navigate};

use crate::state::session::use_session;

/// [`Navigator`] over the Leptos router. The intent is kept in the shared
/// [`IntentSlot`] rather than history state so the login page can read it
/// without touching the browser API.
pub struct LeptosNavigator<F> {
    navigate: F,
    intents: IntentSlot,
}

impl<F> LeptosNavigator<F>
where
    F: Fn(&str, NavigateOptions),
{
    pub fn new(navigate: F, intents: IntentSlot) -> Self {
        Self { navigate, intents }
    }
}

impl<F> Navigator for LeptosNavigator<F>
where
    F: Fn(&str, NavigateOptions),
{
    fn redirect(&self, path: &str, options: RedirectOptions) {
        if let Some(intent) = options.state {
            self.intents.stash(intent);
        }
        (self.navigate)(path, NavigateOptions { replace: options.replace, ..NavigateOptions::default() });
    }
}

fn with_prefix(part: &str, prefix: char) -> String {
    if part.is_empty() || part.starts_with(prefix) {
        part.to_owned()
    } else {
        format!("{prefix}{part}")
    }
}

/// Router location parts as a gate [`Location`].
pub(crate) fn gate_location(pathname: &str, search: &str, hash: &str) -> Location {
    Location {
        pathname: if pathname.is_empty() { "/".to_owned() } else { pathname.to_owned() },
        search: with_prefix(search, '?'),
        hash: with_prefix(hash, '#'),
    }
}

/// Render `children` only once the session, verification and profile gates
/// all pass.
#[component]
pub fn ProtectedRoute(children: ChildrenFn) -> impl IntoView {
    let ctx = use_session();
    let location = use_location();
    let navigator = LeptosNavigator::new(use_navigate(), ctx.intents.clone());
    let guard = ctx.guard.clone();

    let decision = Memo::new(move |_| ctx.decision());

    Effect::new(move || {
        decision.track();
        let here = gate_location(
            &location.pathname.get_untracked(),
            &location.search.get_untracked(),
            &location.hash.get_untracked(),
        );
        let outcome = guard.guard(&here, (), &navigator);
        #[cfg(feature = "hydrate")]
        log::debug!("guard at {}: {}", here.pathname, outcome.decision().as_str());
        #[cfg(not(feature = "hydrate"))]
        let _ = outcome;
    });

    view! {
        <Show when=move || decision.get() == AccessDecision::Allow fallback=|| view! { <GatePlaceholder/> }>
            {children()}
        </Show>
    }
}

/// Neutral placeholder while the decision is pending or a redirect is underway.
#[component]
fn GatePlaceholder() -> impl IntoView {
    view! { <div class="gate-placeholder" aria-busy="true"></div> }
}
