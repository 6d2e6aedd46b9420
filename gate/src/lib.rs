//! # gate
//!
//! Session bootstrap and route guarding for the bookclub app.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every protected page is gated behind three facts: is someone signed in,
//! has their email been verified, and has their application profile been
//! provisioned. This crate owns those facts and the decision derived from
//! them, independent of any UI framework or storage backend:
//!
//! - [`session::SessionStore`] mirrors the identity provider's change stream.
//! - [`profile::ProfileResolver`] caches profile existence per identity.
//! - [`decision::decide`] maps the current facts to an [`decision::AccessDecision`].
//! - [`guard::RouteGuard`] acts on the decision for one protected view.
//!
//! The `client` crate binds these to Leptos signals; the `server` crate plays
//! the identity provider and profile store over HTTP.

pub mod config;
pub mod decision;
pub mod error;
pub mod guard;
pub mod identity;
pub mod intent;
pub mod profile;
pub mod session;
pub mod subscription;

pub use config::{GateConfig, GuardRoutes};
pub use decision::{AccessDecision, AccessInputs, decide};
pub use error::{GateError, StoreError};
pub use guard::{Guarded, Navigator, RouteGuard};
pub use identity::Identity;
pub use intent::{IntentSlot, Location, NavigationIntent, RedirectOptions};
pub use profile::{ProfileRecord, ProfileResolver, ProfileStatus, ProfileStore};
pub use session::{SessionState, SessionStore};
pub use subscription::{IdentityHub, IdentityProvider, Subscription};
