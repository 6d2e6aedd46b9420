//! Gate configuration: page paths and the identity-provider timeout.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::time::Duration;

use serde::Deserialize;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_VERIFY_PATH: &str = "/verify-email";
pub const DEFAULT_PROVISION_PATH: &str = "/setup";
pub const DEFAULT_HOME_PATH: &str = "/";
pub const DEFAULT_PROVIDER_TIMEOUT_MS: u64 = 10_000;

/// Where each redirect decision sends the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GuardRoutes {
    pub login: String,
    pub verify: String,
    pub provision: String,
    pub home: String,
}

impl Default for GuardRoutes {
    fn default() -> Self {
        Self {
            login: DEFAULT_LOGIN_PATH.to_owned(),
            verify: DEFAULT_VERIFY_PATH.to_owned(),
            provision: DEFAULT_PROVISION_PATH.to_owned(),
            home: DEFAULT_HOME_PATH.to_owned(),
        }
    }
}

impl GuardRoutes {
    /// True for the gate's own step pages, which must never be a return target.
    #[must_use]
    pub fn is_gate_page(&self, pathname: &str) -> bool {
        [&self.login, &self.verify, &self.provision]
            .iter()
            .any(|page| page.as_str() == pathname)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub routes: GuardRoutes,
    /// Give up on the identity provider after this long and treat the
    /// session as signed out. `None` waits forever.
    pub provider_timeout_ms: Option<u64>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self { routes: GuardRoutes::default(), provider_timeout_ms: Some(DEFAULT_PROVIDER_TIMEOUT_MS) }
    }
}

impl GateConfig {
    #[must_use]
    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis)
    }
}
