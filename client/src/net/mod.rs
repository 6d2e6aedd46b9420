//! Networking modules for the HTTP API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls, `identity` turns their results into identity
//! provider events, and `types` defines the shared wire schema.

pub mod api;
pub mod identity;
pub mod types;
