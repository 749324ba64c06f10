use crate::error::{ActionResult, PortalError};
use crate::models::User;
use crate::session;
use crate::store::{self, RecordStore, keys};

fn following_ids(store: &impl RecordStore, user_id: &str) -> ActionResult<Vec<String>> {
    Ok(store::read(store, &keys::following(user_id))?)
}

fn find_user(store: &impl RecordStore, id: &str) -> ActionResult<User> {
    let users: Vec<User> = store::read(store, keys::USERS)?;
    users
        .into_iter()
        .find(|u| u.id == id)
        .ok_or_else(|| PortalError::UserNotFound(id.to_string()))
}

/// Everyone except the current user, flagged with whether they are followed.
pub fn directory(store: &impl RecordStore) -> ActionResult<Vec<(User, bool)>> {
    let me = session::require_user(store, "browse the network")?;
    let followed = following_ids(store, &me.id)?;
    let users: Vec<User> = store::read(store, keys::USERS)?;

    Ok(users
        .into_iter()
        .filter(|u| u.id != me.id)
        .map(|u| {
            let is_followed = followed.contains(&u.id);
            (u, is_followed)
        })
        .collect())
}

/// Returns false when the user was already followed.
pub fn follow(store: &impl RecordStore, user_id: &str) -> ActionResult<bool> {
    let me = session::require_user(store, "follow users")?;
    if me.id == user_id {
        return Err(PortalError::CannotFollowSelf);
    }
    let target = find_user(store, user_id)?;

    let mut ids = following_ids(store, &me.id)?;
    if ids.contains(&target.id) {
        return Ok(false);
    }
    ids.push(target.id);
    store::write(store, &keys::following(&me.id), &ids)?;
    log::info!("user {} now follows {}", me.id, user_id);
    Ok(true)
}

/// Returns false when the user was not followed to begin with.
pub fn unfollow(store: &impl RecordStore, user_id: &str) -> ActionResult<bool> {
    let me = session::require_user(store, "unfollow users")?;

    let mut ids = following_ids(store, &me.id)?;
    let before = ids.len();
    ids.retain(|id| id != user_id);
    if ids.len() == before {
        return Ok(false);
    }
    store::write(store, &keys::following(&me.id), &ids)?;
    log::info!("user {} unfollowed {}", me.id, user_id);
    Ok(true)
}

pub fn following(store: &impl RecordStore) -> ActionResult<Vec<User>> {
    let me = session::require_user(store, "see who you follow")?;
    let ids = following_ids(store, &me.id)?;
    let users: Vec<User> = store::read(store, keys::USERS)?;
    Ok(users.into_iter().filter(|u| ids.contains(&u.id)).collect())
}

/// Followers are not stored; every follow list in the store is scanned for
/// the current user's id.
pub fn followers(store: &impl RecordStore) -> ActionResult<Vec<User>> {
    let me = session::require_user(store, "see your followers")?;

    let mut follower_ids = Vec::new();
    for key in store::keys_with_prefix(store, keys::FOLLOWING_PREFIX)? {
        let ids: Vec<String> = store::read(store, &key)?;
        if ids.contains(&me.id) {
            follower_ids.push(key[keys::FOLLOWING_PREFIX.len()..].to_string());
        }
    }

    let users: Vec<User> = store::read(store, keys::USERS)?;
    Ok(users.into_iter().filter(|u| follower_ids.contains(&u.id)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth;
    use crate::store::MemoryStore;

    fn ids(users: &[User]) -> Vec<&str> {
        users.iter().map(|u| u.id.as_str()).collect()
    }

    #[test]
    fn test_follow_is_idempotent() {
        let store = MemoryStore::new();
        auth::login(&store, "student@app.com", "password").unwrap();

        assert!(follow(&store, "4").unwrap());
        assert!(!follow(&store, "4").unwrap());
        let stored: Vec<String> = store::read(&store, &keys::following("5")).unwrap();
        assert_eq!(stored, vec!["4"]);
    }

    #[test]
    fn test_unfollow_missing_is_noop() {
        let store = MemoryStore::new();
        auth::login(&store, "student@app.com", "password").unwrap();
        assert!(!unfollow(&store, "2").unwrap());
        assert_eq!(store.get(&keys::following("5")).unwrap(), None);

        follow(&store, "2").unwrap();
        follow(&store, "3").unwrap();
        assert!(unfollow(&store, "2").unwrap());
        assert_eq!(ids(&following(&store).unwrap()), vec!["3"]);
    }

    #[test]
    fn test_follow_rejects_self_and_unknown() {
        let store = MemoryStore::new();
        auth::login(&store, "student@app.com", "password").unwrap();
        assert!(matches!(follow(&store, "5"), Err(PortalError::CannotFollowSelf)));
        assert!(matches!(follow(&store, "77"), Err(PortalError::UserNotFound(_))));
    }

    #[test]
    fn test_directory_flags_followed_users() {
        let store = MemoryStore::new();
        auth::login(&store, "student@app.com", "password").unwrap();
        follow(&store, "2").unwrap();

        let flagged: Vec<String> = directory(&store)
            .unwrap()
            .into_iter()
            .filter(|(_, followed)| *followed)
            .map(|(u, _)| u.id)
            .collect();
        assert_eq!(flagged, vec!["2"]);
    }

    #[test]
    fn test_followers_derived_from_other_lists() {
        let store = MemoryStore::new();
        auth::login(&store, "admin@app.com", "password").unwrap();
        follow(&store, "5").unwrap();
        auth::login(&store, "mentor@app.com", "password").unwrap();
        follow(&store, "5").unwrap();
        follow(&store, "1").unwrap();

        auth::login(&store, "student@app.com", "password").unwrap();
        assert_eq!(ids(&followers(&store).unwrap()), vec!["1", "4"]);
        // following is not reciprocal
        assert!(following(&store).unwrap().is_empty());

        let dir = directory(&store).unwrap();
        assert_eq!(dir.len(), 4);
        assert!(dir.iter().all(|(u, followed)| u.id != "5" && !followed));
    }
}
