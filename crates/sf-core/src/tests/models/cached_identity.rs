use crate::tests::models::{profile_for, test_user};
use crate::{AuthSnapshot, CachedIdentity, Role};

#[test]
fn given_cached_user_when_rehydrated_then_loading_is_suppressed() {
    let user = test_user();
    let record = CachedIdentity {
        profile: Some(profile_for(&user, Role::Customer)),
        user: Some(user.clone()),
        is_authenticated: true,
    };

    let snapshot = record.into_snapshot();

    assert!(!snapshot.is_loading);
    assert!(snapshot.is_authenticated);
    assert_eq!(snapshot.user, Some(user));
}

#[test]
fn given_empty_record_when_rehydrated_then_bootstrap_still_pending() {
    let record = CachedIdentity {
        user: None,
        profile: None,
        is_authenticated: false,
    };

    let snapshot = record.into_snapshot();

    assert!(snapshot.is_loading);
    assert!(!snapshot.is_authenticated);
}

#[test]
fn given_inconsistent_cached_flag_when_rehydrated_then_recomputed_from_user() {
    // A hand-edited or corrupted record claiming authentication without a
    // user must not rehydrate as authenticated.
    let record = CachedIdentity {
        user: None,
        profile: None,
        is_authenticated: true,
    };

    let snapshot = record.into_snapshot();

    assert!(!snapshot.is_authenticated);
}

#[test]
fn given_orphaned_profile_when_rehydrated_then_profile_dropped() {
    let user = test_user();
    let record = CachedIdentity {
        user: None,
        profile: Some(profile_for(&user, Role::Admin)),
        is_authenticated: false,
    };

    let snapshot = record.into_snapshot();

    assert!(snapshot.profile.is_none());
    assert!(!snapshot.is_admin());
}

#[test]
fn given_snapshot_when_converted_to_record_then_loading_not_captured() {
    let user = test_user();
    let snapshot = AuthSnapshot {
        profile: Some(profile_for(&user, Role::Customer)),
        user: Some(user.clone()),
        is_authenticated: true,
        is_loading: true,
    };

    let record = CachedIdentity::from_snapshot(&snapshot);

    assert_eq!(record.user, Some(user));
    assert!(record.is_authenticated);
    // Round-tripping through the record resets the loading state.
    assert!(!record.into_snapshot().is_loading);
}
