//! Feeds the browser's view of the server session into the identity hub.
//!
//! SYSTEM CONTEXT
//! ==============
//! The server owns sessions; the client learns about them only through
//! `/api/auth/me` and the login/verify responses. Every one of those paths
//! ends in `IdentityHub::publish`, which is what the session store listens to.
//!
//! A refresh publishes only what the server actually said. When `/me` cannot
//! be asked (network down, 5xx), the hub keeps its current value; before the
//! first answer that means the store stays unsettled until the provider
//! timeout.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use gate::{IdentityHub, StoreError};

use super::api;
use super::types::Identity;

/// Re-read `/api/auth/me` and publish a definite result. Used at start-up,
/// after the verify page's "check again", and whenever the session may have
/// moved.
///
/// # Errors
///
/// Passes through the [`StoreError`] of a failed read; nothing is published.
pub async fn refresh_identity(hub: &IdentityHub) -> Result<Option<Identity>, StoreError> {
    let outcome = api::fetch_current_user().await;
    publish_outcome(hub, &outcome);
    outcome
}

fn publish_outcome(hub: &IdentityHub, outcome: &Result<Option<Identity>, StoreError>) {
    match outcome {
        Ok(identity) => hub.publish(identity.clone()),
        Err(e) => {
            #[cfg(feature = "hydrate")]
            log::warn!("identity refresh failed, keeping current session state: {e}");
            #[cfg(not(feature = "hydrate"))]
            let _ = e;
        }
    }
}

/// Publish an identity returned directly by a login/register/confirm call.
pub fn adopt_identity(hub: &IdentityHub, identity: Identity) {
    hub.publish(Some(identity));
}

/// Drop the server session and publish the signed-out state.
pub async fn sign_out(hub: &IdentityHub) {
    api::logout().await;
    hub.publish(None);
}
