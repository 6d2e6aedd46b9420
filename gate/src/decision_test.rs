use super::*;
use crate::identity::Identity;

fn inputs(loading: bool, identity_present: bool, email_verified: bool, profile_exists: bool) -> AccessInputs {
    AccessInputs { loading, identity_present, email_verified, profile_exists }
}

fn expected(i: AccessInputs) -> AccessDecision {
    match (i.loading, i.identity_present, i.email_verified, i.profile_exists) {
        (true, _, _, _) => AccessDecision::SuspendRender,
        (false, false, _, _) => AccessDecision::RedirectLogin,
        (false, true, false, _) => AccessDecision::RedirectVerify,
        (false, true, true, false) => AccessDecision::RedirectProvision,
        (false, true, true, true) => AccessDecision::Allow,
    }
}

const ALL: [AccessDecision; 5] = [
    AccessDecision::SuspendRender,
    AccessDecision::RedirectLogin,
    AccessDecision::RedirectVerify,
    AccessDecision::RedirectProvision,
    AccessDecision::Allow,
];

fn reader(verified: bool) -> Identity {
    Identity {
        id: "u1".to_owned(),
        email: "u1@example.com".to_owned(),
        email_verified: verified,
        display_name: None,
    }
}

// =============================================================================
// Truth table
// =============================================================================

#[test]
fn every_input_tuple_matches_precedence_table() {
    let mut seen = std::collections::HashSet::new();
    for bits in 0u8..16 {
        let i = inputs(bits & 8 != 0, bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);
        let decision = decide(i);
        assert_eq!(decision, expected(i), "inputs {i:?}");
        seen.insert(decision);
    }
    assert_eq!(seen.len(), ALL.len(), "every outcome is reachable");
}

#[test]
fn decide_is_idempotent() {
    for bits in 0u8..16 {
        let i = inputs(bits & 8 != 0, bits & 4 != 0, bits & 2 != 0, bits & 1 != 0);
        let first = decide(i);
        for _ in 0..3 {
            assert_eq!(decide(i), first);
        }
    }
}

#[test]
fn loading_dominates_everything() {
    assert_eq!(decide(inputs(true, true, true, true)), AccessDecision::SuspendRender);
    assert_eq!(decide(inputs(true, false, false, false)), AccessDecision::SuspendRender);
}

#[test]
fn unverified_without_profile_goes_to_verify_not_provision() {
    assert_eq!(decide(inputs(false, true, false, false)), AccessDecision::RedirectVerify);
}

#[test]
fn decide_is_usable_in_const_context() {
    const OPEN: AccessDecision = decide(AccessInputs {
        loading: false,
        identity_present: true,
        email_verified: true,
        profile_exists: true,
    });
    assert_eq!(OPEN, AccessDecision::Allow);
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn scenario_loading_suspends() {
    let state = SessionState::default();
    assert_eq!(decide(AccessInputs::from_state(&state, ProfileStatus::Exists)), AccessDecision::SuspendRender);
}

#[test]
fn scenario_signed_out_redirects_to_login() {
    let state = SessionState::settled(None);
    assert_eq!(decide(AccessInputs::from_state(&state, ProfileStatus::Pending)), AccessDecision::RedirectLogin);
}

#[test]
fn scenario_unverified_redirects_to_verify() {
    let state = SessionState::settled(Some(reader(false)));
    assert_eq!(decide(AccessInputs::from_state(&state, ProfileStatus::Missing)), AccessDecision::RedirectVerify);
}

#[test]
fn scenario_verified_without_profile_redirects_to_provision() {
    let state = SessionState::settled(Some(reader(true)));
    assert_eq!(
        decide(AccessInputs::from_state(&state, ProfileStatus::Missing)),
        AccessDecision::RedirectProvision
    );
}

#[test]
fn scenario_verified_with_profile_is_allowed() {
    let state = SessionState::settled(Some(reader(true)));
    assert_eq!(decide(AccessInputs::from_state(&state, ProfileStatus::Exists)), AccessDecision::Allow);
}

#[test]
fn profile_read_in_flight_counts_as_loading() {
    let state = SessionState::settled(Some(reader(true)));
    let i = AccessInputs::from_state(&state, ProfileStatus::Pending);
    assert!(i.loading);
    assert_eq!(decide(i), AccessDecision::SuspendRender);
}

// =============================================================================
// Redirect targets
// =============================================================================

#[test]
fn redirect_paths_follow_routes() {
    let routes = GuardRoutes::default();
    assert_eq!(AccessDecision::RedirectLogin.redirect_path(&routes), Some("/login"));
    assert_eq!(AccessDecision::RedirectVerify.redirect_path(&routes), Some("/verify-email"));
    assert_eq!(AccessDecision::RedirectProvision.redirect_path(&routes), Some("/setup"));
    assert_eq!(AccessDecision::Allow.redirect_path(&routes), None);
    assert_eq!(AccessDecision::SuspendRender.redirect_path(&routes), None);
}

#[test]
fn only_redirects_report_is_redirect() {
    let redirects: Vec<_> = ALL.into_iter().filter(|d| d.is_redirect()).collect();
    assert_eq!(
        redirects,
        vec![AccessDecision::RedirectLogin, AccessDecision::RedirectVerify, AccessDecision::RedirectProvision]
    );
}
