//! Session Store: the current identity and whether it has settled.
//!
//! DESIGN
//! ======
//! One store per app, created at start-up and handed to guards explicitly.
//! The identity provider's callback is the only writer. Consumers read
//! snapshots or subscribe to them; nothing about the callback history is
//! kept beyond the latest value.
//!
//! LIFECYCLE
//! =========
//! `new` -> `init(provider)` -> callbacks -> `dispose` (or drop). The provider
//! listener is held as a [`Subscription`], so dropping the store also
//! unregisters it.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::sync::{Arc, Mutex};

use crate::error::GateError;
use crate::identity::Identity;
use crate::subscription::{IdentityProvider, Listeners, Subscription, lock};

/// Snapshot of the session as consumers see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub identity: Option<Identity>,
    /// True until the identity provider reports for the first time.
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { identity: None, loading: true }
    }
}

impl SessionState {
    #[must_use]
    pub fn settled(identity: Option<Identity>) -> Self {
        Self { identity, loading: false }
    }

    #[must_use]
    pub fn identity_id(&self) -> Option<&str> {
        self.identity.as_ref().map(|identity| identity.id.as_str())
    }
}

pub struct SessionStore {
    state: Mutex<SessionState>,
    listeners: Listeners<SessionState>,
    provider_subscription: Mutex<Option<Subscription>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(SessionState::default()),
            listeners: Listeners::new(),
            provider_subscription: Mutex::new(None),
        })
    }

    /// Register the single provider listener. Re-initialising replaces the
    /// previous listener.
    pub fn init(self: &Arc<Self>, provider: &dyn IdentityProvider) {
        let previous = lock(&self.provider_subscription).take();
        drop(previous);

        {
            let mut state = lock(&self.state);
            state.identity = provider.current().flatten();
            state.loading = true;
        }

        let store = Arc::downgrade(self);
        let subscription = provider.subscribe(Box::new(move |identity: Option<Identity>| {
            if let Some(store) = store.upgrade() {
                store.apply(identity);
            }
        }));
        *lock(&self.provider_subscription) = Some(subscription);
        tracing::debug!("session store initialised");
    }

    /// Unregister from the provider. Safe to call more than once.
    pub fn dispose(&self) {
        let subscription = lock(&self.provider_subscription).take();
        if let Some(subscription) = subscription {
            subscription.cancel();
            tracing::debug!("session store disposed");
        }
    }

    #[cfg(test)]
    pub(crate) fn is_initialised(&self) -> bool {
        lock(&self.provider_subscription).is_some()
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        lock(&self.state).clone()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        lock(&self.state).identity.clone()
    }

    #[cfg(test)]
    pub(crate) fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Observe every settled snapshot.
    pub fn subscribe(&self, listener: impl Fn(&SessionState) + Send + Sync + 'static) -> Subscription {
        self.listeners.add(listener)
    }

    /// Settle as signed out if the provider still hasn't reported. Returns
    /// `true` when it did so. A later provider callback still wins.
    pub fn expire_if_unsettled(&self) -> bool {
        let snapshot = {
            let mut state = lock(&self.state);
            if !state.loading {
                return false;
            }
            state.identity = None;
            state.loading = false;
            state.clone()
        };
        tracing::warn!(error = %GateError::ProviderUnavailable, "no identity callback, settling as signed out");
        self.listeners.emit(&snapshot);
        true
    }

    fn apply(&self, identity: Option<Identity>) {
        let snapshot = {
            let mut state = lock(&self.state);
            state.identity = identity;
            state.loading = false;
            state.clone()
        };
        tracing::debug!(identity_id = snapshot.identity_id().unwrap_or("-"), "session settled");
        self.listeners.emit(&snapshot);
    }
}
