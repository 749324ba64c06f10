use crate::error::{ActionResult, PortalError, require};
use crate::models::User;
use crate::session;
use crate::store::{self, RecordStore, keys};

const EMAIL_CHANNEL: &str = "email";

/// Fields the profile editor may change; `None` leaves a field as it is.
/// Role and id are not editable.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub dob: Option<String>,
    pub phone_no: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub email_notifications: Option<bool>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.dob.is_none()
            && self.phone_no.is_none()
            && self.street.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.zipcode.is_none()
            && self.email_notifications.is_none()
    }

    fn apply_to(self, user: &mut User) -> ActionResult<()> {
        let required = [
            ("First name", self.first_name, &mut user.first_name),
            ("Last name", self.last_name, &mut user.last_name),
            ("Email", self.email, &mut user.email),
            ("Password", self.password, &mut user.password),
        ];
        for (label, value, slot) in required {
            if let Some(value) = value {
                require(label, &value)?;
                *slot = value;
            }
        }

        let optional = [
            (self.dob, &mut user.dob),
            (self.phone_no, &mut user.phone_no),
            (self.street, &mut user.street),
            (self.city, &mut user.city),
            (self.state, &mut user.state),
            (self.zipcode, &mut user.zipcode),
        ];
        for (value, slot) in optional {
            if let Some(value) = value {
                *slot = value;
            }
        }

        if let Some(enabled) = self.email_notifications {
            user.notification_preferences = if enabled {
                vec![EMAIL_CHANNEL.to_string()]
            } else {
                Vec::new()
            };
        }
        Ok(())
    }
}

pub fn show(store: &impl RecordStore) -> ActionResult<User> {
    session::require_user(store, "view your profile")
}

pub fn wants_email_notifications(user: &User) -> bool {
    user.notification_preferences.iter().any(|p| p == EMAIL_CHANNEL)
}

/// Merges the changes into the canonical user record. The session only holds
/// the user id, so it picks the edit up without being rewritten.
pub fn update_profile(store: &impl RecordStore, changes: ProfileChanges) -> ActionResult<User> {
    let current = session::require_user(store, "update your profile")?;

    let mut users: Vec<User> = store::read(store, keys::USERS)?;
    if let Some(email) = &changes.email {
        if users.iter().any(|u| u.id != current.id && &u.email == email) {
            return Err(PortalError::UserExists {
                email: email.clone(),
            });
        }
    }

    let user = users
        .iter_mut()
        .find(|u| u.id == current.id)
        .ok_or_else(|| PortalError::UserNotFound(current.id.clone()))?;
    changes.apply_to(user)?;
    let updated = user.clone();

    store::write(store, keys::USERS, &users)?;
    log::info!("profile updated for user {}", updated.id);
    Ok(updated)
}
