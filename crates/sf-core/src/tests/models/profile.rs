use crate::tests::models::test_user;
use crate::{ProfileDraft, Role, UserAccount};

use uuid::Uuid;

#[test]
fn given_user_with_metadata_when_first_login_draft_then_metadata_carried() {
    let user = test_user();

    let draft = ProfileDraft::first_login(&user);

    assert_eq!(draft.id, user.id);
    assert_eq!(draft.email, user.email);
    assert_eq!(draft.full_name, "Sam Shopper");
    assert_eq!(draft.phone, "+15550100");
    assert_eq!(draft.role, Role::Customer);
}

#[test]
fn given_user_without_metadata_when_first_login_draft_then_empty_strings() {
    let user = UserAccount::new(Uuid::new_v4(), "bare@example.com".to_string());

    let draft = ProfileDraft::first_login(&user);

    assert_eq!(draft.full_name, "");
    assert_eq!(draft.phone, "");
    assert_eq!(draft.role, Role::Customer);
}
