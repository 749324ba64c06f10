use thiserror::Error;

use crate::models::UserRole;

pub type ActionResult<T> = std::result::Result<T, PortalError>;

/// Everything a user action can fail with. Every variant is terminal to the
/// action that raised it and is reported once, as a single notification.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("{0} is required.")]
    MissingField(&'static str),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("Passwords do not match.")]
    PasswordMismatch,

    #[error("A user with email {email} already exists.")]
    UserExists { email: String },

    #[error("Invalid email or password.")]
    InvalidCredentials,

    #[error("You must be logged in to {0}.")]
    NotLoggedIn(&'static str),

    #[error("Your {role} account cannot {action}.")]
    Forbidden { action: &'static str, role: UserRole },

    #[error("User '{0}' not found.")]
    UserNotFound(String),

    #[error("Job '{0}' not found.")]
    JobNotFound(String),

    #[error("This job is already in your saved list.")]
    AlreadySaved,

    #[error("You have already applied to this job.")]
    AlreadyApplied,

    #[error("Application '{0}' not found.")]
    ApplicationNotFound(String),

    #[error("Event '{0}' not found.")]
    EventNotFound(String),

    #[error("Session '{session_id}' not found in event '{event_id}'.")]
    SessionNotFound { event_id: String, session_id: String },

    #[error("You have already registered for this session.")]
    AlreadyRegistered,

    #[error("Reservation '{0}' not found.")]
    ReservationNotFound(String),

    #[error("Mentor '{0}' not found.")]
    MentorNotFound(String),

    #[error("You are already registered as a mentor.")]
    AlreadyMentor,

    #[error("You cannot follow yourself.")]
    CannotFollowSelf,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl PortalError {
    /// Title line used when the error is surfaced as a notification.
    pub fn title(&self) -> &'static str {
        match self {
            PortalError::AlreadySaved => "Job Already Saved",
            PortalError::AlreadyRegistered => "Already Registered",
            PortalError::AlreadyMentor => "Already a Mentor",
            PortalError::Store(_) => "Storage Error",
            _ => "Error",
        }
    }
}

/// Rejects blank values for a required form field.
pub fn require(field: &'static str, value: &str) -> ActionResult<()> {
    if value.trim().is_empty() {
        return Err(PortalError::MissingField(field));
    }
    Ok(())
}
