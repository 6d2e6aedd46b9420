//! Reactive session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! The `gate` session store, profile resolver and route guard are plain
//! thread-safe objects. This module mirrors them into Leptos signals so
//! guards and pages re-render when the identity settles, changes, or its
//! profile resolves.
//!
//! LIFECYCLE
//! =========
//! `provide_session` runs once in `App`. It wires the store to the identity
//! hub, starts the `/api/auth/me` bootstrap, arms the provider timeout and
//! registers `on_cleanup` so the store listener goes away with the app.
//!
//! Once a profile read for the current identity lands, the settings stored
//! on the profile (theme, font size) replace the browser's local preference.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::Arc;

use gate::profile::Resolution;
use gate::{
    AccessDecision, GateConfig, IdentityHub, IntentSlot, ProfileRecord, ProfileResolver, RouteGuard, SessionState,
    SessionStore,
};
use leptos::prelude::*;

use crate::net::types::ProfileSettings;

/// Everything a guard or gate page needs, shared through context.
#[derive(Clone)]
pub struct SessionContext {
    /// Reactive copy of the store snapshot.
    pub session: RwSignal<SessionState>,
    pub store: Arc<SessionStore>,
    pub hub: IdentityHub,
    pub profiles: Arc<ProfileResolver>,
    /// Decides and redirects against `store` and `profiles`.
    pub guard: RouteGuard,
    /// Bumped whenever the resolver cache changes, since the resolver itself
    /// is not reactive.
    pub profile_revision: RwSignal<u64>,
    pub intents: IntentSlot,
    /// Verification code echoed by registration (development servers only),
    /// shown on the verify page.
    pub echoed_code: RwSignal<Option<String>>,
    pub config: GateConfig,
}

impl SessionContext {
    fn new(config: GateConfig) -> Self {
        let store = SessionStore::new();
        let profiles = Arc::new(ProfileResolver::new());
        let guard = RouteGuard::new(Arc::clone(&store), Arc::clone(&profiles), config.routes.clone());
        Self {
            session: RwSignal::new(SessionState::default()),
            store,
            hub: IdentityHub::new(),
            profiles,
            guard,
            profile_revision: RwSignal::new(0),
            intents: IntentSlot::new(),
            echoed_code: RwSignal::new(None),
            config,
        }
    }

    /// Current access decision. Tracks both the session and the profile cache.
    pub fn decision(&self) -> AccessDecision {
        self.session.track();
        self.profile_revision.track();
        self.guard.evaluate()
    }

    /// Mark the signed-in user's profile as created and re-run guards.
    pub fn mark_provisioned(&self, identity_id: &str) {
        self.profiles.record_provisioned(identity_id);
        self.bump_profiles();
    }

    /// Drop the cached profile answer for the signed-in user and read again.
    pub fn refresh_profile(&self) {
        if let Some(identity) = self.store.identity() {
            self.profiles.invalidate(&identity.id);
        }
        self.sync_profile();
    }

    fn bump_profiles(&self) {
        self.profile_revision.update(|n| *n = n.wrapping_add(1));
    }

    /// Bring the profile cache in line with the current identity. In the
    /// browser this reads the profile when the resolver asks for it; the
    /// revision is bumped after every settle, read or not, because switching
    /// identity alone changes what the cache answers.
    fn sync_profile(&self) {
        #[cfg(feature = "hydrate")]
        {
            let guard = self.guard.clone();
            let revision = self.profile_revision;
            leptos::task::spawn_local(async move {
                let store = crate::net::api::HttpProfileStore::default();
                let resolution = guard.settle_profile(&store).await;
                if let Some(resolution) = &resolution {
                    log::debug!("profile resolution: {resolution:?}");
                }
                if let Some(settings) = settings_to_adopt(resolution.as_ref(), store.take_last_read()) {
                    crate::util::theme::persist(&settings);
                }
                revision.update(|n| *n = n.wrapping_add(1));
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = self.profiles.track(self.store.identity().as_ref());
            self.bump_profiles();
        }
    }
}

/// Settings to apply after a profile read: only when the read was applied to
/// the current identity, found a profile, and that profile stores settings.
pub(crate) fn settings_to_adopt(resolution: Option<&Resolution>, record: Option<ProfileRecord>) -> Option<ProfileSettings> {
    match (resolution, record) {
        (Some(Resolution::Applied { exists: true }), Some(record))
            if record.settings.as_object().is_some_and(|m| !m.is_empty()) =>
        {
            Some(ProfileSettings::from_record(&record))
        }
        _ => None,
    }
}

/// Create the session context, wire it to the identity hub and provide it.
pub fn provide_session(config: GateConfig) -> SessionContext {
    let ctx = SessionContext::new(config);

    let session = ctx.session;
    let mirror = ctx.store.subscribe(move |state| session.set(state.clone()));
    ctx.store.init(&ctx.hub);

    let store = Arc::clone(&ctx.store);
    on_cleanup(move || {
        drop(mirror);
        store.dispose();
    });

    let sync = ctx.clone();
    Effect::new(move || {
        sync.session.track();
        sync.sync_profile();
    });

    #[cfg(feature = "hydrate")]
    {
        let hub = ctx.hub.clone();
        leptos::task::spawn_local(async move {
            let _ = crate::net::identity::refresh_identity(&hub).await;
        });

        if let Some(timeout) = ctx.config.provider_timeout() {
            let store = Arc::clone(&ctx.store);
            leptos::task::spawn_local(async move {
                gloo_timers::future::sleep(timeout).await;
                if store.expire_if_unsettled() {
                    log::warn!("identity provider silent after {timeout:?}; treating session as signed out");
                }
            });
        }
    }

    provide_context(ctx.clone());
    ctx
}

/// Fetch the session context provided by `App`.
pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}
