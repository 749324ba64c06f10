use serde::{Deserialize, Serialize};

use crate::error::{ActionResult, PortalError};
use crate::models::{User, UserRole};
use crate::store::{self, RecordStore, keys};

/// What `currentUser` holds: a pointer into `users`, never a copy of the
/// record, so profile edits are visible to the session straight away.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    // Older stores kept the whole user object here; its `id` still resolves.
    #[serde(alias = "id")]
    user_id: String,
}

pub fn start(store: &impl RecordStore, user: &User) -> ActionResult<()> {
    let record = SessionRecord {
        user_id: user.id.clone(),
    };
    store::write(store, keys::CURRENT_USER, &record)?;
    log::info!("session started for user {}", user.id);
    Ok(())
}

pub fn end(store: &impl RecordStore) -> ActionResult<()> {
    store.remove(keys::CURRENT_USER)?;
    Ok(())
}

/// The logged-in user, resolved against the canonical `users` collection.
pub fn current_user(store: &impl RecordStore) -> ActionResult<Option<User>> {
    let Some(record) = store::read::<Option<SessionRecord>, _>(store, keys::CURRENT_USER)? else {
        return Ok(None);
    };
    let users: Vec<User> = store::read(store, keys::USERS)?;
    let user = users.into_iter().find(|u| u.id == record.user_id);
    if user.is_none() {
        log::warn!("session points at missing user {}", record.user_id);
    }
    Ok(user)
}

pub fn require_user(store: &impl RecordStore, action: &'static str) -> ActionResult<User> {
    current_user(store)?.ok_or(PortalError::NotLoggedIn(action))
}

pub fn require_role(
    store: &impl RecordStore,
    action: &'static str,
    roles: &[UserRole],
) -> ActionResult<User> {
    let user = require_user(store, action)?;
    if !user.has_role(roles) {
        return Err(PortalError::Forbidden {
            action,
            role: user.role,
        });
    }
    Ok(user)
}
