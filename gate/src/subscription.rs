//! Listener registries, unsubscribe handles, and the identity provider seam.
//!
//! DESIGN
//! ======
//! Every `subscribe` returns a [`Subscription`]. Dropping the handle
//! unregisters the listener, so a scope that ends early (or unwinds) still
//! cleans up. Callbacks are snapshotted before they run, which lets a
//! listener subscribe or unsubscribe from inside its own callback.

#[cfg(test)]
#[path = "subscription_test.rs"]
mod tests;

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::identity::Identity;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Handle for a registered listener. Unregisters on drop.
#[must_use = "dropping a Subscription unregisters its listener"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    /// Unregister now.
    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cancel.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("active", &self.is_active()).finish()
    }
}

// =============================================================================
// LISTENERS
// =============================================================================

type Callback<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct ListenerTable<T> {
    next_id: u64,
    entries: Vec<(u64, Callback<T>)>,
}

/// Explicit subscription list. Cloning shares the same list.
pub struct Listeners<T> {
    table: Arc<Mutex<ListenerTable<T>>>,
}

impl<T: 'static> Listeners<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { table: Arc::new(Mutex::new(ListenerTable { next_id: 0, entries: Vec::new() })) }
    }

    pub fn add(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut table = lock(&self.table);
            let id = table.next_id;
            table.next_id += 1;
            table.entries.push((id, Arc::new(listener)));
            id
        };
        let table = Arc::downgrade(&self.table);
        Subscription::new(move || {
            if let Some(table) = table.upgrade() {
                lock(&table).entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    /// Invoke every registered listener, in registration order.
    pub fn emit(&self, value: &T) {
        let callbacks: Vec<Callback<T>> = lock(&self.table)
            .entries
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(value);
        }
    }

    pub(crate) fn len(&self) -> usize {
        lock(&self.table).entries.len()
    }
}

impl<T: 'static> Default for Listeners<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Listeners<T> {
    fn clone(&self) -> Self {
        Self { table: Arc::clone(&self.table) }
    }
}

// =============================================================================
// IDENTITY PROVIDER
// =============================================================================

pub type IdentityListener = Box<dyn Fn(Option<Identity>) + Send + Sync>;

/// External source of identity changes (login, logout, token refresh).
pub trait IdentityProvider: Send + Sync {
    /// Current state. `None` until the provider has settled; `Some(None)` when
    /// settled and signed out.
    fn current(&self) -> Option<Option<Identity>>;

    /// Register a change listener. Fires once immediately when the provider
    /// has already settled, then on every change.
    fn subscribe(&self, listener: IdentityListener) -> Subscription;
}

/// In-process identity provider fed by whoever talks to the auth backend.
#[derive(Clone, Default)]
pub struct IdentityHub {
    state: Arc<Mutex<Option<Option<Identity>>>>,
    listeners: Listeners<Option<Identity>>,
}

impl IdentityHub {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new identity state and notify every listener.
    pub fn publish(&self, identity: Option<Identity>) {
        tracing::debug!(
            identity_id = identity.as_ref().map_or("-", |i| i.id.as_str()),
            listeners = self.listeners.len(),
            "identity changed"
        );
        *lock(&self.state) = Some(identity.clone());
        self.listeners.emit(&identity);
    }

    #[cfg(test)]
    pub(crate) fn is_settled(&self) -> bool {
        lock(&self.state).is_some()
    }

    #[cfg(test)]
    pub(crate) fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl IdentityProvider for IdentityHub {
    fn current(&self) -> Option<Option<Identity>> {
        lock(&self.state).clone()
    }

    fn subscribe(&self, listener: IdentityListener) -> Subscription {
        let listener: Arc<dyn Fn(Option<Identity>) + Send + Sync> = Arc::from(listener);
        let registered = Arc::clone(&listener);
        let subscription = self.listeners.add(move |identity: &Option<Identity>| registered(identity.clone()));
        if let Some(identity) = self.current() {
            listener(identity);
        }
        subscription
    }
}
