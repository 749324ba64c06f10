use crate::error::{ActionResult, PortalError, require};
use crate::models::{self, User, UserRole};
use crate::seed;
use crate::session;
use crate::store::{self, RecordStore, keys};

/// The registration form is filled in three fixed steps, always in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationStep {
    Account,
    Personal,
    Address,
}

impl RegistrationStep {
    pub const FIRST: RegistrationStep = RegistrationStep::Account;

    pub fn number(self) -> u8 {
        match self {
            RegistrationStep::Account => 1,
            RegistrationStep::Personal => 2,
            RegistrationStep::Address => 3,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            RegistrationStep::Account => Some(RegistrationStep::Personal),
            RegistrationStep::Personal => Some(RegistrationStep::Address),
            RegistrationStep::Address => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegistrationForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: String,
    pub phone_no: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub role: UserRole,
}

impl RegistrationForm {
    /// Required-field check for the fields shown on one step.
    pub fn validate_step(&self, step: RegistrationStep) -> ActionResult<()> {
        match step {
            RegistrationStep::Account => {
                require("Email", &self.email)?;
                require("Password", &self.password)?;
                require("Confirm password", &self.confirm_password)
            }
            RegistrationStep::Personal => {
                require("First name", &self.first_name)?;
                require("Last name", &self.last_name)?;
                require("Date of birth", &self.dob)?;
                require("Phone number", &self.phone_no)
            }
            // state is a picker with no required marker
            RegistrationStep::Address => {
                require("Street", &self.street)?;
                require("City", &self.city)?;
                require("Zipcode", &self.zipcode)
            }
        }
    }

    fn into_user(self, id: String) -> User {
        User {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            password: self.password,
            dob: self.dob,
            phone_no: self.phone_no,
            street: self.street,
            city: self.city,
            state: self.state,
            zipcode: self.zipcode,
            role: self.role,
            notification_preferences: Vec::new(),
        }
    }
}

/// Next sequential user id: one past the largest numeric id in use. Falls
/// back to a uuid once the numeric range is exhausted.
fn next_user_id(users: &[User]) -> String {
    let max = users
        .iter()
        .filter_map(|u| u.id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    match max.checked_add(1) {
        Some(next) => next.to_string(),
        None => {
            log::warn!("numeric user ids exhausted, using a uuid");
            models::new_id()
        }
    }
}

pub fn register(store: &impl RecordStore, form: RegistrationForm) -> ActionResult<User> {
    let mut step = Some(RegistrationStep::FIRST);
    while let Some(current) = step {
        form.validate_step(current)?;
        log::debug!("registration step {} complete", current.number());
        step = current.next();
    }

    if form.password != form.confirm_password {
        return Err(PortalError::PasswordMismatch);
    }

    let mut users: Vec<User> = store::read(store, keys::USERS)?;
    if users.iter().any(|u| u.email == form.email) {
        return Err(PortalError::UserExists { email: form.email });
    }

    let user = form.into_user(next_user_id(&users));
    users.push(user.clone());
    store::write(store, keys::USERS, &users)?;

    log::info!("registered user {} as {}", user.id, user.role);
    Ok(user)
}

/// Adds the built-in test accounts whose email is not registered yet.
/// A seed account whose id is already taken gets the next free id.
pub fn seed_users(store: &impl RecordStore) -> ActionResult<usize> {
    let mut users: Vec<User> = store::read(store, keys::USERS)?;
    let mut added = 0;

    for mut account in seed::users() {
        if users.iter().any(|u| u.email == account.email) {
            continue;
        }
        if users.iter().any(|u| u.id == account.id) {
            account.id = next_user_id(&users);
        }
        users.push(account);
        added += 1;
    }

    if added > 0 {
        store::write(store, keys::USERS, &users)?;
        log::debug!("seeded {} test accounts", added);
    }
    Ok(added)
}

pub fn login(store: &impl RecordStore, email: &str, password: &str) -> ActionResult<User> {
    seed_users(store)?;

    let users: Vec<User> = store::read(store, keys::USERS)?;
    let user = users
        .into_iter()
        .find(|u| u.email == email && u.password == password)
        .ok_or(PortalError::InvalidCredentials)?;

    session::start(store, &user)?;
    Ok(user)
}

pub fn logout(store: &impl RecordStore) -> ActionResult<()> {
    session::end(store)
}
