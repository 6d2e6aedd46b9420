//! Access Decision Engine.
//!
//! A total, pure mapping from the four session facts to one of five
//! outcomes. Precedence is fixed: loading, then identity, then email
//! verification, then profile existence. An unverified identity without a
//! profile lands on the verify page, never on provisioning.

#[cfg(test)]
#[path = "decision_test.rs"]
mod tests;

use crate::config::GuardRoutes;
use crate::profile::ProfileStatus;
use crate::session::SessionState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessDecision {
    /// Render nothing (or a neutral placeholder) until the facts settle.
    SuspendRender,
    RedirectLogin,
    RedirectVerify,
    RedirectProvision,
    Allow,
}

impl AccessDecision {
    /// Target page for redirect outcomes.
    #[must_use]
    pub fn redirect_path(self, routes: &GuardRoutes) -> Option<&str> {
        match self {
            Self::RedirectLogin => Some(&routes.login),
            Self::RedirectVerify => Some(&routes.verify),
            Self::RedirectProvision => Some(&routes.provision),
            Self::SuspendRender | Self::Allow => None,
        }
    }

    #[must_use]
    pub const fn is_redirect(self) -> bool {
        matches!(self, Self::RedirectLogin | Self::RedirectVerify | Self::RedirectProvision)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuspendRender => "suspend_render",
            Self::RedirectLogin => "redirect_login",
            Self::RedirectVerify => "redirect_verify",
            Self::RedirectProvision => "redirect_provision",
            Self::Allow => "allow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[allow(clippy::struct_excessive_bools)]
pub struct AccessInputs {
    pub loading: bool,
    pub identity_present: bool,
    pub email_verified: bool,
    pub profile_exists: bool,
}

impl AccessInputs {
    /// Combine a session snapshot with the profile status of its identity.
    /// A profile read still in flight counts as loading.
    #[must_use]
    pub fn from_state(session: &SessionState, profile: ProfileStatus) -> Self {
        let identity = session.identity.as_ref();
        let profile_pending = identity.is_some() && profile == ProfileStatus::Pending;
        Self {
            loading: session.loading || profile_pending,
            identity_present: identity.is_some(),
            email_verified: identity.is_some_and(|i| i.email_verified),
            profile_exists: profile == ProfileStatus::Exists,
        }
    }
}

#[must_use]
pub const fn decide(inputs: AccessInputs) -> AccessDecision {
    if inputs.loading {
        return AccessDecision::SuspendRender;
    }
    if !inputs.identity_present {
        return AccessDecision::RedirectLogin;
    }
    if !inputs.email_verified {
        return AccessDecision::RedirectVerify;
    }
    if !inputs.profile_exists {
        return AccessDecision::RedirectProvision;
    }
    AccessDecision::Allow
}
