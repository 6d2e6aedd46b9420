//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool and the parsed server configuration. All
//! request-scoped data (identity, profile) lives in Postgres.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::ServerConfig;

/// Clone is required by Axum; the pool is internally reference-counted and the
/// config is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: ServerConfig) -> Self {
        Self { pool, config: Arc::new(config) }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================


#[cfg(test)]
#[path = "state_test.rs"]
mod tests;
