//! Service layer: database-backed account, session, verification, Google
//! sign-in and profile operations. Route handlers stay thin and map these errors to
//! HTTP statuses.

pub mod account;
pub mod google;
pub mod profile;
pub mod session;
pub mod verification;
