use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

// Field names follow the stored JSON layout (camelCase), so every record
// round-trips through the same keys the web pages wrote.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Employer,
    Organizer,
    Mentor,
    #[default]
    Student,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UserRole::Admin => "admin",
            UserRole::Employer => "employer",
            UserRole::Organizer => "organizer",
            UserRole::Mentor => "mentor",
            UserRole::Student => "student",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String, // stored as entered
    pub dob: String,
    pub phone_no: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notification_preferences: Vec<String>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn has_role(&self, roles: &[UserRole]) -> bool {
        roles.contains(&self.role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Onsite,
    Remote,
    Hybrid,
}

impl fmt::Display for WorkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkMode::Onsite => "onsite",
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JobType {
    Job,
    Internship,
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobType::Job => "job",
            JobType::Internship => "internship",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: String,
    pub title: String,
    pub company: String,
    pub description: String,
    pub full_description: String,
    pub salary: String,
    pub posted_ago: String, // free text, e.g. "5 hours ago"
    pub work_mode: WorkMode,
    #[serde(rename = "type")]
    pub job_type: JobType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
pub enum ApplicationStatus {
    #[default]
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Interview Scheduled")]
    InterviewScheduled,
    Hired,
    Rejected,
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ApplicationStatus::UnderReview => "Under Review",
            ApplicationStatus::InterviewScheduled => "Interview Scheduled",
            ApplicationStatus::Hired => "Hired",
            ApplicationStatus::Rejected => "Rejected",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobApplication {
    pub id: String,
    #[serde(rename = "jobID")]
    pub job_id: String,
    #[serde(default)]
    pub job_title: String,
    /// Older records only carry the applicant's email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub applicant_id: Option<String>,
    pub applicant_name: String,
    pub applicant_email: String,
    #[serde(rename = "resumeURL")]
    pub resume_url: String,
    #[serde(rename = "coverLetterURL", default)]
    pub cover_letter_url: String,
    #[serde(rename = "linkedinURL", default)]
    pub linkedin_url: String,
    #[serde(rename = "additionalDocumentsR2URL", default)]
    pub additional_documents_url: String,
    #[serde(default)]
    pub application_status: ApplicationStatus,
    pub submitted_at: String,
    pub last_updated: String,
    #[serde(default)]
    pub notes: String,
    pub job_type: JobType,
    pub salary: String,
    pub work_mode: WorkMode,
}

impl JobApplication {
    pub fn belongs_to(&self, user: &User) -> bool {
        match &self.applicant_id {
            Some(id) => *id == user.id,
            None => self.applicant_email == user.email,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum EventType {
    Conference,
    Workshop,
    Seminar,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EventType::Conference => "Conference",
            EventType::Workshop => "Workshop",
            EventType::Seminar => "Seminar",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSession {
    pub id: String,
    pub event_id: String,
    pub title: String,
    pub description: String,
    pub start_time: String, // YYYY-MM-DDTHH:MM:SS
    pub end_time: String,
    pub location: String,
    pub max_attendees: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub start_date: String, // YYYY-MM-DD
    pub end_date: String,
    pub location: String,
    pub is_virtual: bool,
    pub max_attendees: u32,
    pub registration_deadline: String,
    pub status: String,
    pub sessions: Vec<EventSession>,
}

impl AcademicEvent {
    pub fn session(&self, session_id: &str) -> Option<&EventSession> {
        self.sessions.iter().find(|s| s.id == session_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReservation {
    pub id: String,
    pub user_id: String,
    pub event_id: String,
    pub event_title: String,
    pub event_description: String,
    pub event_type: EventType,
    pub event_start_date: String,
    pub event_end_date: String,
    pub event_location: String,
    pub session_id: String,
    pub session_title: String,
    pub session_description: String,
    pub session_start_time: String,
    pub session_end_time: String,
    pub session_location: String,
}

impl EventReservation {
    pub fn new(id: String, user_id: String, event: &AcademicEvent, session: &EventSession) -> Self {
        Self {
            id,
            user_id,
            event_id: event.id.clone(),
            event_title: event.title.clone(),
            event_description: event.description.clone(),
            event_type: event.event_type,
            event_start_date: event.start_date.clone(),
            event_end_date: event.end_date.clone(),
            event_location: event.location.clone(),
            session_id: session.id.clone(),
            session_title: session.title.clone(),
            session_description: session.description.clone(),
            session_start_time: session.start_time.clone(),
            session_end_time: session.end_time.clone(),
            session_location: session.location.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mentor {
    pub id: String, // the mentor's user id
    pub name: String,
    pub title: String,
    pub company: String,
    pub expertise: Vec<String>,
    pub bio: String,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MentorshipApplication {
    pub id: String,
    pub name: String,
    pub email: String,
    pub mentor: String, // Mentor.id
    pub message: String,
    pub submitted_at: String,
}

/// Current instant in the stored timestamp format.
pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
