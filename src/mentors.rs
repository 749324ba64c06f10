use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ActionResult, PortalError, require};
use crate::models::{self, Mentor, MentorshipApplication, User};
use crate::seed;
use crate::session;
use crate::store::{self, RecordStore, keys};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Default)]
pub struct MentorProfileForm {
    /// Defaults to the user's full name when blank.
    pub name: String,
    pub title: String,
    pub company: String,
    /// Comma separated, e.g. "Rust, Compilers".
    pub expertise: String,
    pub bio: String,
    pub image_url: String,
}

#[derive(Debug, Clone, Default)]
pub struct MentorshipRequest {
    /// Name and email fall back to the logged-in user's.
    pub name: Option<String>,
    pub email: Option<String>,
    pub mentor: String,
    pub message: String,
}

fn min_len(field: &'static str, value: &str, min: usize) -> ActionResult<()> {
    if value.trim().chars().count() < min {
        return Err(PortalError::InvalidField {
            field,
            reason: format!("must be at least {} characters", min),
        });
    }
    Ok(())
}

pub fn split_expertise(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Built-in mentors first, then everyone who signed up.
pub fn list_mentors(store: &impl RecordStore) -> ActionResult<Vec<Mentor>> {
    let stored: Vec<Mentor> = store::read(store, keys::MENTORS)?;
    let mut mentors = seed::mentors();
    mentors.extend(stored);
    Ok(mentors)
}

pub fn is_mentor(store: &impl RecordStore, user: &User) -> ActionResult<bool> {
    let stored: Vec<Mentor> = store::read(store, keys::MENTORS)?;
    Ok(stored.iter().any(|m| m.id == user.id))
}

pub fn become_mentor(store: &impl RecordStore, form: MentorProfileForm) -> ActionResult<Mentor> {
    let user = session::require_user(store, "become a mentor")?;

    let mut stored: Vec<Mentor> = store::read(store, keys::MENTORS)?;
    if stored.iter().any(|m| m.id == user.id) {
        return Err(PortalError::AlreadyMentor);
    }

    require("Title", &form.title)?;
    require("Company", &form.company)?;
    require("Bio", &form.bio)?;
    let expertise = split_expertise(&form.expertise);
    if expertise.is_empty() {
        return Err(PortalError::MissingField("Expertise"));
    }

    let name = if form.name.trim().is_empty() {
        user.full_name()
    } else {
        form.name
    };

    let mentor = Mentor {
        id: user.id.clone(),
        name,
        title: form.title,
        company: form.company,
        expertise,
        bio: form.bio,
        image_url: form.image_url,
    };
    stored.push(mentor.clone());
    store::write(store, keys::MENTORS, &stored)?;

    log::info!("user {} registered as a mentor", user.id);
    Ok(mentor)
}

pub fn apply_for_mentorship(
    store: &impl RecordStore,
    request: MentorshipRequest,
) -> ActionResult<MentorshipApplication> {
    let user = session::current_user(store)?;
    let name = request
        .name
        .or_else(|| user.as_ref().map(User::full_name))
        .unwrap_or_default();
    let email = request
        .email
        .or_else(|| user.as_ref().map(|u| u.email.clone()))
        .unwrap_or_default();

    min_len("Name", &name, 2)?;
    if !EMAIL_RE.is_match(email.trim()) {
        return Err(PortalError::InvalidField {
            field: "Email",
            reason: format!("'{}' is not a valid email address", email),
        });
    }
    require("Mentor", &request.mentor)?;
    min_len("Message", &request.message, 10)?;

    if !list_mentors(store)?.iter().any(|m| m.id == request.mentor) {
        return Err(PortalError::MentorNotFound(request.mentor));
    }

    let application = MentorshipApplication {
        id: models::new_id(),
        name,
        email,
        mentor: request.mentor,
        message: request.message,
        submitted_at: models::timestamp(),
    };

    let mut applications: Vec<MentorshipApplication> =
        store::read(store, keys::MENTORSHIP_APPLICATIONS)?;
    applications.push(application.clone());
    store::write(store, keys::MENTORSHIP_APPLICATIONS, &applications)?;

    log::info!("mentorship application {} for mentor {}", application.id, application.mentor);
    Ok(application)
}

/// Every application with the mentor it names, when that mentor still exists.
pub fn mentorship_applications(
    store: &impl RecordStore,
) -> ActionResult<Vec<(MentorshipApplication, Option<Mentor>)>> {
    let applications: Vec<MentorshipApplication> =
        store::read(store, keys::MENTORSHIP_APPLICATIONS)?;
    let mentors = list_mentors(store)?;

    Ok(applications
        .into_iter()
        .map(|app| {
            let mentor = mentors.iter().find(|m| m.id == app.mentor).cloned();
            (app, mentor)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth;
    use crate::store::MemoryStore;

    fn profile() -> MentorProfileForm {
        MentorProfileForm {
            name: String::new(),
            title: "Staff Engineer".to_string(),
            company: "Ferrous Systems".to_string(),
            expertise: " Rust, , Embedded ,Compilers".to_string(),
            bio: "Twenty years of systems work.".to_string(),
            image_url: String::new(),
        }
    }

    fn request(mentor: &str) -> MentorshipRequest {
        MentorshipRequest {
            mentor: mentor.to_string(),
            message: "I would love help with my thesis.".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_split_expertise_drops_blanks() {
        assert_eq!(
            split_expertise(" Rust, , Embedded ,Compilers"),
            vec!["Rust", "Embedded", "Compilers"]
        );
    }

    #[test]
    fn test_become_mentor_once() {
        let store = MemoryStore::new();
        let user = auth::login(&store, "mentor@app.com", "password").unwrap();
        assert!(!is_mentor(&store, &user).unwrap());

        let mentor = become_mentor(&store, profile()).unwrap();
        assert_eq!(mentor.id, user.id);
        assert_eq!(mentor.name, "Mentor User");
        assert!(is_mentor(&store, &user).unwrap());

        assert!(matches!(
            become_mentor(&store, profile()),
            Err(PortalError::AlreadyMentor)
        ));

        let listed = list_mentors(&store).unwrap();
        assert_eq!(listed.len(), 4);
        assert_eq!(listed[3], mentor);
    }

    #[test]
    fn test_seed_mentors_are_not_stored() {
        let store = MemoryStore::new();
        assert_eq!(list_mentors(&store).unwrap().len(), 3);
        assert_eq!(store.get(keys::MENTORS).unwrap(), None);
    }

    #[test]
    fn test_apply_fills_identity_from_session() {
        let store = MemoryStore::new();
        auth::login(&store, "student@app.com", "password").unwrap();
        let app = apply_for_mentorship(&store, request("2")).unwrap();
        assert_eq!(app.name, "Student User");
        assert_eq!(app.email, "student@app.com");

        let listed = mentorship_applications(&store).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1.as_ref().map(|m| m.name.as_str()), Some("Michael Rodriguez"));
    }

    #[test]
    fn test_apply_validation() {
        let store = MemoryStore::new();

        let anonymous = request("1");
        assert!(matches!(
            apply_for_mentorship(&store, anonymous),
            Err(PortalError::InvalidField { field: "Name", .. })
        ));

        let bad_email = MentorshipRequest {
            name: Some("Grace".to_string()),
            email: Some("grace@localhost".to_string()),
            ..request("1")
        };
        assert!(matches!(
            apply_for_mentorship(&store, bad_email),
            Err(PortalError::InvalidField { field: "Email", .. })
        ));

        let short = MentorshipRequest {
            name: Some("Grace".to_string()),
            email: Some("grace@navy.mil".to_string()),
            message: "hi".to_string(),
            ..request("1")
        };
        assert!(matches!(
            apply_for_mentorship(&store, short),
            Err(PortalError::InvalidField { field: "Message", .. })
        ));

        let unknown = MentorshipRequest {
            name: Some("Grace".to_string()),
            email: Some("grace@navy.mil".to_string()),
            ..request("42")
        };
        assert!(matches!(
            apply_for_mentorship(&store, unknown),
            Err(PortalError::MentorNotFound(_))
        ));
        assert_eq!(store.get(keys::MENTORSHIP_APPLICATIONS).unwrap(), None);
    }

    #[test]
    fn test_dangling_mentor_reference_resolves_to_none() {
        let store = MemoryStore::new();
        let orphan = MentorshipApplication {
            id: "x".to_string(),
            name: "Old".to_string(),
            email: "old@x.com".to_string(),
            mentor: "999".to_string(),
            message: "left over from before".to_string(),
            submitted_at: models::timestamp(),
        };
        store::write(&store, keys::MENTORSHIP_APPLICATIONS, &vec![orphan]).unwrap();
        let listed = mentorship_applications(&store).unwrap();
        assert!(listed[0].1.is_none());
    }
}
