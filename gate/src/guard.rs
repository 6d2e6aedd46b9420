//! Route Guard: decide and act for one protected view.
//!
//! The guard keeps no state between invocations. Each call reads the
//! current session snapshot and cached profile status, recomputes the
//! decision, and either renders the view, renders nothing, or redirects
//! with the guarded location attached as the navigation intent.

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;

use std::sync::Arc;

use crate::config::GuardRoutes;
use crate::decision::{AccessDecision, AccessInputs, decide};
use crate::intent::{Location, RedirectOptions};
use crate::profile::{ProfileResolver, ProfileStatus, ProfileStore, Resolution};
use crate::session::SessionStore;

/// Client-side navigation.
pub trait Navigator {
    fn redirect(&self, path: &str, options: RedirectOptions);
}

/// What the guard produced for one render pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guarded<V> {
    /// Decision pending; show a neutral placeholder.
    Suspended,
    /// Access granted; the view, untouched.
    Render(V),
    /// The navigator was asked to go to `to`.
    Redirected { decision: AccessDecision, to: String },
}

impl<V> Guarded<V> {
    #[must_use]
    pub fn decision(&self) -> AccessDecision {
        match self {
            Self::Suspended => AccessDecision::SuspendRender,
            Self::Render(_) => AccessDecision::Allow,
            Self::Redirected { decision, .. } => *decision,
        }
    }
}

/// Carry out `decision` for the view at `location`.
pub fn act<V, N>(decision: AccessDecision, routes: &GuardRoutes, location: &Location, view: V, navigator: &N) -> Guarded<V>
where
    N: Navigator + ?Sized,
{
    if let Some(path) = decision.redirect_path(routes) {
        tracing::debug!(
            decision = decision.as_str(),
            from = %location.pathname,
            to = path,
            "guard redirect"
        );
        navigator.redirect(path, RedirectOptions::guard_redirect(location.clone()));
        return Guarded::Redirected { decision, to: path.to_owned() };
    }
    match decision {
        AccessDecision::Allow => Guarded::Render(view),
        _ => Guarded::Suspended,
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    session: Arc<SessionStore>,
    profiles: Arc<ProfileResolver>,
    routes: GuardRoutes,
}

impl RouteGuard {
    #[must_use]
    pub fn new(session: Arc<SessionStore>, profiles: Arc<ProfileResolver>, routes: GuardRoutes) -> Self {
        Self { session, profiles, routes }
    }

    #[must_use]
    pub fn routes(&self) -> &GuardRoutes {
        &self.routes
    }

    #[must_use]
    pub fn inputs(&self) -> AccessInputs {
        let state = self.session.snapshot();
        let profile = state
            .identity_id()
            .map_or(ProfileStatus::Pending, |id| self.profiles.status(id));
        AccessInputs::from_state(&state, profile)
    }

    #[must_use]
    pub fn evaluate(&self) -> AccessDecision {
        decide(self.inputs())
    }

    pub fn guard<V, N>(&self, location: &Location, view: V, navigator: &N) -> Guarded<V>
    where
        N: Navigator + ?Sized,
    {
        act(self.evaluate(), &self.routes, location, view, navigator)
    }

    /// Bring the profile cache in line with the current identity, reading
    /// from `store` if needed. `None` when no read was required.
    pub async fn settle_profile<S>(&self, store: &S) -> Option<Resolution>
    where
        S: ProfileStore + ?Sized,
    {
        let identity = self.session.identity();
        let ticket = self.profiles.track(identity.as_ref())?;
        let result = store.get_profile(ticket.identity_id()).await;
        Some(self.profiles.complete(&ticket, result))
    }
}
