//! Client state modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `session` owns the reactive view of who is signed in and whether their
//! account is provisioned. Everything else is page-local.

pub mod session;
