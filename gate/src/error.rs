//! Error taxonomy for session bootstrap and profile resolution.
//!
//! ERROR HANDLING
//! ==============
//! None of these reach the user as a blocking error screen. Each one is
//! logged and the guard moves the user to a recoverable page (login,
//! verify, or provision) instead.

/// Failure reading from the profile document store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
    #[error("profile store returned status {0}")]
    Status(u16),
    #[error("profile decode failed: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    /// The identity provider never reported a state within the allowed time.
    #[error("identity provider did not respond")]
    ProviderUnavailable,
    /// The profile read failed; the profile is treated as missing.
    #[error("profile read failed: {0}")]
    ProfileRead(#[from] StoreError),
    /// A profile read finished for an identity that is no longer current.
    #[error("stale profile resolution for {received} (current: {})", .expected.as_deref().unwrap_or("none"))]
    StaleResolution { expected: Option<String>, received: String },
}
