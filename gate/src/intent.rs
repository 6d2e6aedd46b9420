//! Navigation Intent: where the user was headed before the guard redirected.
//!
//! The intent rides along with a guard redirect, survives the login /
//! verify / provision steps in memory, and is consumed exactly once when
//! the user is sent back. It is never persisted.

#[cfg(test)]
#[path = "intent_test.rs"]
mod tests;

use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::config::GuardRoutes;
use crate::subscription::lock;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub pathname: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub hash: String,
}

impl Location {
    /// Split a relative URL into path, `?query` and `#fragment`.
    #[cfg(test)]
    pub(crate) fn parse(href: &str) -> Self {
        let (rest, hash) = match href.find('#') {
            Some(idx) => (&href[..idx], &href[idx..]),
            None => (href, ""),
        };
        let (pathname, search) = match rest.find('?') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let pathname = if pathname.is_empty() { "/" } else { pathname };
        Self { pathname: pathname.to_owned(), search: search.to_owned(), hash: hash.to_owned() }
    }

    #[must_use]
    pub fn href(&self) -> String {
        format!("{}{}{}", self.pathname, self.search, self.hash)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationIntent {
    pub from: Location,
}

impl NavigationIntent {
    #[must_use]
    pub fn from_location(from: Location) -> Self {
        Self { from }
    }
}

/// Options attached to a navigation. Guard redirects always replace the
/// current history entry so the guarded URL is not left behind as a dead end.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RedirectOptions {
    pub replace: bool,
    pub state: Option<NavigationIntent>,
}

impl RedirectOptions {
    #[must_use]
    pub fn guard_redirect(from: Location) -> Self {
        Self { replace: true, state: Some(NavigationIntent::from_location(from)) }
    }
}

/// Holds at most one pending intent. Clones share the slot.
#[derive(Debug, Clone, Default)]
pub struct IntentSlot {
    pending: Arc<Mutex<Option<NavigationIntent>>>,
}

impl IntentSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember an intent. A newer redirect replaces an older one.
    pub fn stash(&self, intent: NavigationIntent) {
        *lock(&self.pending) = Some(intent);
    }

    /// Consume the pending intent.
    #[must_use]
    pub fn take(&self) -> Option<NavigationIntent> {
        lock(&self.pending).take()
    }

    #[must_use]
    pub fn peek(&self) -> Option<NavigationIntent> {
        lock(&self.pending).clone()
    }
}

/// Where to send the user once a gate step completes. Never one of the
/// gate's own pages, which would bounce straight back.
#[must_use]
pub fn return_path(intent: Option<&NavigationIntent>, routes: &GuardRoutes) -> String {
    intent
        .filter(|intent| !routes.is_gate_page(&intent.from.pathname))
        .map_or_else(|| routes.home.clone(), |intent| intent.from.href())
}
