//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The login, verify-email and setup pages are steps of the gate rather than
//! protected pages, so they are not wrapped in `ProtectedRoute`. Each still
//! has to leave once its step is done: forward to the next unmet step, or
//! back to where the user was headed when every step passes.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use gate::intent::return_path;
use gate::{AccessDecision, GuardRoutes};
use leptos::prelude::*;
use leptos_router::NavigateOptions;

use crate::state::session::SessionContext;

/// Where a step page should go for the current decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StepExit {
    Stay,
    /// Another step is still unmet.
    Forward(String),
    /// Everything passes; consume the intent.
    Return,
}

/// Exit for the step page that handles `own`.
pub fn step_exit(decision: AccessDecision, own: AccessDecision, routes: &GuardRoutes) -> StepExit {
    match decision {
        AccessDecision::SuspendRender => StepExit::Stay,
        AccessDecision::Allow => StepExit::Return,
        other if other == own => StepExit::Stay,
        other => other
            .redirect_path(routes)
            .map_or(StepExit::Stay, |path| StepExit::Forward(path.to_owned())),
    }
}

/// Navigate away from the step page for `own` whenever its step is settled.
pub fn install_step_exit<F>(ctx: SessionContext, own: AccessDecision, navigate: F)
where
    F: Fn(&str, NavigateOptions) + Clone + 'static,
{
    Effect::new(move || {
        let decision = ctx.decision();
        let routes = ctx.guard.routes();
        let target = match step_exit(decision, own, routes) {
            StepExit::Stay => return,
            StepExit::Forward(path) => path,
            StepExit::Return => return_path(ctx.intents.take().as_ref(), routes),
        };
        navigate(&target, NavigateOptions { replace: true, ..NavigateOptions::default() });
    });
}
