use super::*;

fn routes() -> GuardRoutes {
    GuardRoutes::default()
}

#[test]
fn step_page_waits_while_suspended() {
    for own in [AccessDecision::RedirectLogin, AccessDecision::RedirectVerify, AccessDecision::RedirectProvision] {
        assert_eq!(step_exit(AccessDecision::SuspendRender, own, &routes()), StepExit::Stay);
    }
}

#[test]
fn step_page_stays_while_its_own_step_is_unmet() {
    assert_eq!(
        step_exit(AccessDecision::RedirectVerify, AccessDecision::RedirectVerify, &routes()),
        StepExit::Stay
    );
}

#[test]
fn login_page_forwards_unverified_user_to_verify() {
    assert_eq!(
        step_exit(AccessDecision::RedirectVerify, AccessDecision::RedirectLogin, &routes()),
        StepExit::Forward("/verify-email".to_owned())
    );
}

#[test]
fn verify_page_forwards_to_setup_once_verified() {
    assert_eq!(
        step_exit(AccessDecision::RedirectProvision, AccessDecision::RedirectVerify, &routes()),
        StepExit::Forward("/setup".to_owned())
    );
}

#[test]
fn setup_page_sends_signed_out_user_to_login() {
    assert_eq!(
        step_exit(AccessDecision::RedirectLogin, AccessDecision::RedirectProvision, &routes()),
        StepExit::Forward("/login".to_owned())
    );
}

#[test]
fn every_step_returns_once_allowed() {
    for own in [AccessDecision::RedirectLogin, AccessDecision::RedirectVerify, AccessDecision::RedirectProvision] {
        assert_eq!(step_exit(AccessDecision::Allow, own, &routes()), StepExit::Return);
    }
}
