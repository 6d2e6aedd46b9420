use super::*;
use std::cell::RefCell;
use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::identity::Identity;
use crate::intent::{IntentSlot, NavigationIntent, return_path};
use crate::profile::ProfileRecord;
use crate::subscription::IdentityHub;

#[derive(Default)]
struct RecordingNavigator {
    calls: RefCell<Vec<(String, RedirectOptions)>>,
}

impl Navigator for RecordingNavigator {
    fn redirect(&self, path: &str, options: RedirectOptions) {
        self.calls.borrow_mut().push((path.to_owned(), options));
    }
}

struct MemoryStore {
    profiles: RefCell<HashSet<String>>,
}

impl MemoryStore {
    fn with(ids: &[&str]) -> Self {
        Self { profiles: RefCell::new(ids.iter().map(|id| (*id).to_owned()).collect()) }
    }
}

#[async_trait(?Send)]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, identity_id: &str) -> Result<Option<ProfileRecord>, StoreError> {
        Ok(self.profiles.borrow().contains(identity_id).then(|| ProfileRecord {
            id: identity_id.to_owned(),
            display_name: "Reader".to_owned(),
            settings: serde_json::Value::Null,
            created_at: None,
        }))
    }
}

fn reader(id: &str, verified: bool) -> Identity {
    Identity {
        id: id.to_owned(),
        email: format!("{id}@example.com"),
        email_verified: verified,
        display_name: None,
    }
}

struct Harness {
    hub: IdentityHub,
    guard: RouteGuard,
    profiles: Arc<ProfileResolver>,
}

fn harness() -> Harness {
    let hub = IdentityHub::new();
    let session = SessionStore::new();
    session.init(&hub);
    let profiles = Arc::new(ProfileResolver::new());
    let guard = RouteGuard::new(session, Arc::clone(&profiles), GuardRoutes::default());
    Harness { hub, guard, profiles }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn suspends_until_provider_reports() {
    let h = harness();
    let nav = RecordingNavigator::default();
    let out = h.guard.guard(&Location::parse("/"), "home", &nav);
    assert_eq!(out, Guarded::Suspended);
    assert!(nav.calls.borrow().is_empty());
}

#[test]
fn signed_out_visit_to_bookshelf_redirects_with_intent() {
    let h = harness();
    h.hub.publish(None);
    let nav = RecordingNavigator::default();

    let out = h.guard.guard(&Location::parse("/bookshelf"), "shelf", &nav);

    assert_eq!(out, Guarded::Redirected { decision: AccessDecision::RedirectLogin, to: "/login".to_owned() });
    let calls = nav.calls.borrow();
    assert_eq!(calls.len(), 1);
    let (path, options) = &calls[0];
    assert_eq!(path, "/login");
    assert!(options.replace);
    assert_eq!(options.state.as_ref().map(|s| s.from.pathname.as_str()), Some("/bookshelf"));
}

#[tokio::test]
async fn login_returns_user_to_original_destination() {
    let h = harness();
    h.hub.publish(None);
    let slot = IntentSlot::new();
    let nav = RecordingNavigator::default();

    h.guard.guard(&Location::parse("/bookshelf"), "shelf", &nav);
    let intent = nav.calls.borrow()[0].1.state.clone().unwrap();
    slot.stash(intent);

    h.hub.publish(Some(reader("u1", true)));
    let store = MemoryStore::with(&["u1"]);
    h.guard.settle_profile(&store).await;

    let target = return_path(slot.take().as_ref(), h.guard.routes());
    assert_eq!(target, "/bookshelf");
    let out = h.guard.guard(&Location::parse(&target), "shelf", &nav);
    assert_eq!(out, Guarded::Render("shelf"));
}

#[tokio::test]
async fn unverified_identity_goes_to_verify() {
    let h = harness();
    h.hub.publish(Some(reader("u1", false)));
    h.guard.settle_profile(&MemoryStore::with(&[])).await;

    let nav = RecordingNavigator::default();
    let out = h.guard.guard(&Location::parse("/"), (), &nav);
    assert_eq!(out.decision(), AccessDecision::RedirectVerify);
    assert_eq!(nav.calls.borrow()[0].0, "/verify-email");
}

#[tokio::test]
async fn verified_without_profile_goes_to_provision() {
    let h = harness();
    h.hub.publish(Some(reader("u1", true)));
    h.guard.settle_profile(&MemoryStore::with(&[])).await;

    let nav = RecordingNavigator::default();
    let out = h.guard.guard(&Location::parse("/"), (), &nav);
    assert_eq!(out, Guarded::Redirected { decision: AccessDecision::RedirectProvision, to: "/setup".to_owned() });
}

#[tokio::test]
async fn allowed_view_is_rendered_unmodified() {
    let h = harness();
    h.hub.publish(Some(reader("u1", true)));
    h.guard.settle_profile(&MemoryStore::with(&["u1"])).await;

    let view = vec![1, 2, 3];
    let nav = RecordingNavigator::default();
    assert_eq!(h.guard.guard(&Location::parse("/"), view.clone(), &nav), Guarded::Render(view));
    assert!(nav.calls.borrow().is_empty());
}

// =============================================================================
// Transitions
// =============================================================================

#[tokio::test]
async fn verify_then_refresh_transitions_to_allow() {
    let h = harness();
    let store = MemoryStore::with(&["u1"]);
    h.hub.publish(Some(reader("u1", false)));
    h.guard.settle_profile(&store).await;
    assert_eq!(h.guard.evaluate(), AccessDecision::RedirectVerify);

    h.hub.publish(Some(reader("u1", true)));
    assert!(h.guard.settle_profile(&store).await.is_none(), "same identity keeps its cache");
    assert_eq!(h.guard.evaluate(), AccessDecision::Allow);
}

#[tokio::test]
async fn provisioning_transitions_to_allow() {
    let h = harness();
    h.hub.publish(Some(reader("u1", true)));
    h.guard.settle_profile(&MemoryStore::with(&[])).await;
    assert_eq!(h.guard.evaluate(), AccessDecision::RedirectProvision);

    h.profiles.record_provisioned("u1");
    assert_eq!(h.guard.evaluate(), AccessDecision::Allow);
}

#[tokio::test]
async fn logout_is_seen_on_next_evaluation() {
    let h = harness();
    h.hub.publish(Some(reader("u1", true)));
    h.guard.settle_profile(&MemoryStore::with(&["u1"])).await;
    assert_eq!(h.guard.evaluate(), AccessDecision::Allow);

    h.hub.publish(None);
    assert_eq!(h.guard.evaluate(), AccessDecision::RedirectLogin);
}

#[test]
fn identity_switch_ignores_previous_identity_read() {
    let h = harness();
    h.hub.publish(Some(reader("a", true)));
    let ticket_a = h.profiles.track(Some(&reader("a", true))).unwrap();

    h.hub.publish(Some(reader("b", true)));
    let ticket_b = h.profiles.track(Some(&reader("b", true))).unwrap();

    // A's read reports a profile; it must not unlock B.
    h.profiles.complete(&ticket_a, Ok(Some(ProfileRecord {
        id: "a".to_owned(),
        display_name: "A".to_owned(),
        settings: serde_json::Value::Null,
        created_at: None,
    })));
    assert_eq!(h.guard.evaluate(), AccessDecision::SuspendRender);

    h.profiles.complete(&ticket_b, Ok(None));
    assert_eq!(h.guard.evaluate(), AccessDecision::RedirectProvision);
}

#[test]
fn profile_read_failure_sends_user_to_provision_not_through() {
    let h = harness();
    h.hub.publish(Some(reader("u1", true)));
    let ticket = h.profiles.track(Some(&reader("u1", true))).unwrap();
    h.profiles.complete(&ticket, Err(StoreError::Unavailable("timeout".to_owned())));
    assert_eq!(h.guard.evaluate(), AccessDecision::RedirectProvision);
}

#[test]
fn evaluate_is_repeatable() {
    let h = harness();
    h.hub.publish(None);
    let first = h.guard.evaluate();
    for _ in 0..5 {
        assert_eq!(h.guard.evaluate(), first);
    }
}

#[test]
fn act_with_suspend_does_not_navigate() {
    let nav = RecordingNavigator::default();
    let out = act(AccessDecision::SuspendRender, &GuardRoutes::default(), &Location::parse("/x"), 7, &nav);
    assert_eq!(out, Guarded::Suspended);
    assert!(nav.calls.borrow().is_empty());
}

#[test]
fn redirect_state_is_the_guarded_location() {
    let nav = RecordingNavigator::default();
    let location = Location::parse("/topics/9?page=2");
    act(AccessDecision::RedirectVerify, &GuardRoutes::default(), &location, (), &nav);
    let calls = nav.calls.borrow();
    assert_eq!(calls[0].1.state, Some(NavigationIntent::from_location(location)));
}
