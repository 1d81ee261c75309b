mod auth_snapshot;
mod cached_identity;
mod profile;

use crate::{Profile, Role, UserAccount};

use chrono::Utc;
use uuid::Uuid;

pub(crate) fn test_user() -> UserAccount {
    UserAccount {
        id: Uuid::new_v4(),
        email: "shopper@example.com".to_string(),
        display_name: Some("Sam Shopper".to_string()),
        phone: Some("+15550100".to_string()),
    }
}

pub(crate) fn profile_for(user: &UserAccount, role: Role) -> Profile {
    let now = Utc::now();
    Profile {
        id: user.id,
        email: user.email.clone(),
        full_name: user.display_name.clone(),
        phone: user.phone.clone(),
        role,
        created_at: now,
        updated_at: now,
    }
}
