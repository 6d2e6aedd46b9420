//! Authenticated principal as reported by the identity provider.

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;

use serde::{Deserialize, Serialize};

/// The signed-in principal. Wire body of `GET /api/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Provider-assigned unique id. Also keys the profile record.
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl Identity {
    /// Name to show in chrome: display name when set, else the email's local part.
    #[must_use]
    pub fn label(&self) -> &str {
        if let Some(name) = self.display_name.as_deref().filter(|n| !n.trim().is_empty()) {
            return name;
        }
        self.email.split('@').next().filter(|local| !local.is_empty()).unwrap_or("user")
    }
}
