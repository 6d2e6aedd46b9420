//! Profile Resolver: does the current identity have an application profile?
//!
//! DESIGN
//! ======
//! A keyed cache, `identity_id -> ProfileEntry`, invalidated whenever the
//! tracked identity id changes. Reads are issued as [`ProfileTicket`]s and a
//! result is applied only if its ticket is still the latest in-flight read
//! for the current identity. Anything else is a stale resolution and is
//! dropped.
//!
//! The resolver does not perform I/O itself except in [`ProfileResolver::resolve`];
//! callers on a single-threaded UI loop use `track` + `complete` around their
//! own spawned read.
//!
//! ERROR HANDLING
//! ==============
//! A failed read is cached as "missing". The guard then sends the user to
//! provisioning rather than granting access on an unknown answer.

#[cfg(test)]
#[path = "profile_test.rs"]
mod tests;

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{GateError, StoreError};
use crate::identity::Identity;
use crate::subscription::lock;

/// Application-level user record keyed by identity id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRecord {
    pub id: String,
    pub display_name: String,
    /// Theme choice, palette, notification flags. Opaque to the gate.
    #[serde(default)]
    pub settings: serde_json::Value,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Point reads against the profile document store.
#[async_trait(?Send)]
pub trait ProfileStore {
    /// `Ok(None)` when no profile exists for `identity_id`.
    async fn get_profile(&self, identity_id: &str) -> Result<Option<ProfileRecord>, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileStatus {
    /// Not read yet, or a read is in flight.
    Pending,
    Exists,
    Missing,
}

/// Claim on one profile read. Only the latest ticket for the current
/// identity can be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileTicket {
    identity_id: String,
    seq: u64,
}

impl ProfileTicket {
    #[must_use]
    pub fn identity_id(&self) -> &str {
        &self.identity_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ProfileEntry {
    pub exists: bool,
    /// Sequence number of the read (or provisioning) that produced this entry.
    pub fetch_seq: u64,
}

/// Outcome of handing a read result back to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Applied { exists: bool },
    /// The read failed; the profile is now cached as missing.
    Failed(StoreError),
    /// The ticket was superseded; nothing changed.
    Stale,
}

#[derive(Debug, Default)]
struct ResolverState {
    current: Option<String>,
    in_flight: Option<ProfileTicket>,
    next_seq: u64,
    cache: HashMap<String, ProfileEntry>,
}

impl ResolverState {
    fn switch_to(&mut self, identity_id: Option<&str>) {
        if self.current.as_deref() == identity_id {
            return;
        }
        tracing::debug!(
            from = self.current.as_deref().unwrap_or("-"),
            to = identity_id.unwrap_or("-"),
            "profile cache invalidated"
        );
        self.cache.clear();
        self.in_flight = None;
        self.current = identity_id.map(str::to_owned);
    }

    fn issue(&mut self, identity_id: String) -> ProfileTicket {
        self.next_seq += 1;
        let ticket = ProfileTicket { identity_id, seq: self.next_seq };
        self.in_flight = Some(ticket.clone());
        ticket
    }
}

#[derive(Debug, Default)]
pub struct ProfileResolver {
    state: Mutex<ResolverState>,
}

impl ProfileResolver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow an identity change. Returns a ticket when a read must be issued.
    pub fn track(&self, identity: Option<&Identity>) -> Option<ProfileTicket> {
        let mut state = lock(&self.state);
        state.switch_to(identity.map(|i| i.id.as_str()));

        let identity_id = state.current.clone()?;
        if state.cache.contains_key(&identity_id) || state.in_flight.is_some() {
            return None;
        }
        Some(state.issue(identity_id))
    }

    /// Apply a finished read if its ticket is still current.
    pub fn complete(&self, ticket: &ProfileTicket, result: Result<Option<ProfileRecord>, StoreError>) -> Resolution {
        let mut state = lock(&self.state);
        if state.in_flight.as_ref() != Some(ticket) {
            let stale = GateError::StaleResolution {
                expected: state.current.clone(),
                received: ticket.identity_id.clone(),
            };
            tracing::debug!(error = %stale, "discarding profile read");
            return Resolution::Stale;
        }
        state.in_flight = None;

        let (exists, resolution) = match result {
            Ok(record) => {
                let exists = record.is_some();
                (exists, Resolution::Applied { exists })
            }
            Err(e) => {
                tracing::warn!(
                    identity_id = %ticket.identity_id,
                    error = %GateError::ProfileRead(e.clone()),
                    "treating profile as missing"
                );
                (false, Resolution::Failed(e))
            }
        };
        state
            .cache
            .insert(ticket.identity_id.clone(), ProfileEntry { exists, fetch_seq: ticket.seq });
        resolution
    }

    #[must_use]
    pub fn status(&self, identity_id: &str) -> ProfileStatus {
        let state = lock(&self.state);
        if state.current.as_deref() != Some(identity_id) {
            return ProfileStatus::Pending;
        }
        match state.cache.get(identity_id) {
            Some(entry) if entry.exists => ProfileStatus::Exists,
            Some(_) => ProfileStatus::Missing,
            None => ProfileStatus::Pending,
        }
    }

    #[cfg(test)]
    pub(crate) fn entry(&self, identity_id: &str) -> Option<ProfileEntry> {
        lock(&self.state).cache.get(identity_id).copied()
    }

    /// Record a successful provisioning step. Any read still in flight would
    /// predate the write and is discarded.
    pub fn record_provisioned(&self, identity_id: &str) {
        let mut state = lock(&self.state);
        state.switch_to(Some(identity_id));
        state.in_flight = None;
        state.next_seq += 1;
        let fetch_seq = state.next_seq;
        state
            .cache
            .insert(identity_id.to_owned(), ProfileEntry { exists: true, fetch_seq });
    }

    /// Forget the cached answer so the next `track` reads again.
    pub fn invalidate(&self, identity_id: &str) {
        let mut state = lock(&self.state);
        if let Some(entry) = state.cache.remove(identity_id) {
            tracing::debug!(identity_id, exists = entry.exists, fetch_seq = entry.fetch_seq, "profile cache entry dropped");
        }
        if state.in_flight.as_ref().is_some_and(|t| t.identity_id == identity_id) {
            state.in_flight = None;
        }
    }

    /// Read-through lookup for one identity.
    ///
    /// # Errors
    ///
    /// `ProfileRead` when the store failed (the profile is cached as missing),
    /// `StaleResolution` when another identity or read superseded this one.
    pub async fn resolve<S>(&self, store: &S, identity: &Identity) -> Result<bool, GateError>
    where
        S: ProfileStore + ?Sized,
    {
        let ticket = {
            let mut state = lock(&self.state);
            state.switch_to(Some(&identity.id));
            if let Some(entry) = state.cache.get(&identity.id) {
                return Ok(entry.exists);
            }
            state.issue(identity.id.clone())
        };

        let result = store.get_profile(&identity.id).await;
        match self.complete(&ticket, result) {
            Resolution::Applied { exists } => Ok(exists),
            Resolution::Failed(e) => Err(GateError::ProfileRead(e)),
            Resolution::Stale => Err(GateError::StaleResolution {
                expected: lock(&self.state).current.clone(),
                received: identity.id.clone(),
            }),
        }
    }
}
