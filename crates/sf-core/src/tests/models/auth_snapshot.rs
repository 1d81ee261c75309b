use crate::tests::models::{profile_for, test_user};
use crate::{AuthSnapshot, Role};

#[test]
fn given_default_snapshot_when_inspected_then_loading_and_anonymous() {
    let snapshot = AuthSnapshot::default();

    assert!(snapshot.is_loading);
    assert!(!snapshot.is_authenticated);
    assert!(snapshot.user.is_none());
    assert!(snapshot.profile.is_none());
}

#[test]
fn given_signed_out_snapshot_when_inspected_then_not_loading() {
    let snapshot = AuthSnapshot::signed_out();

    assert!(!snapshot.is_loading);
    assert!(!snapshot.is_authenticated);
    assert!(snapshot.user.is_none());
    assert!(snapshot.profile.is_none());
}

#[test]
fn given_authenticated_admin_when_is_admin_then_true() {
    let user = test_user();
    let snapshot = AuthSnapshot {
        profile: Some(profile_for(&user, Role::Admin)),
        user: Some(user),
        is_authenticated: true,
        is_loading: false,
    };

    assert!(snapshot.is_admin());
    assert!(!snapshot.is_customer());
}

#[test]
fn given_stale_admin_profile_on_signed_out_identity_when_is_admin_then_false() {
    // A profile object can outlive its session in memory; the role must
    // never be readable off a logically signed-out identity.
    let user = test_user();
    let snapshot = AuthSnapshot {
        user: None,
        profile: Some(profile_for(&user, Role::Admin)),
        is_authenticated: false,
        is_loading: false,
    };

    assert!(!snapshot.is_admin());
    assert!(!snapshot.is_customer());
}

#[test]
fn given_authenticated_user_without_profile_when_checked_then_not_admin() {
    let user = test_user();
    let snapshot = AuthSnapshot {
        user: Some(user),
        profile: None,
        is_authenticated: true,
        is_loading: false,
    };

    assert!(!snapshot.is_admin());
    assert!(!snapshot.is_customer());
}
