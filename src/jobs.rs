use std::collections::HashSet;

use crate::error::{ActionResult, PortalError, require};
use crate::models::{
    self, ApplicationStatus, Job, JobApplication, JobType, User, UserRole, WorkMode,
};
use crate::seed;
use crate::session;
use crate::store::{self, RecordStore, keys};

const POSTING_ROLES: [UserRole; 2] = [UserRole::Employer, UserRole::Admin];

#[derive(Debug, Clone, Copy, Default)]
pub struct JobFilter {
    pub job_type: Option<JobType>,
    pub work_mode: Option<WorkMode>,
}

impl JobFilter {
    fn matches(&self, job: &Job) -> bool {
        self.job_type.is_none_or(|t| job.job_type == t)
            && self.work_mode.is_none_or(|m| job.work_mode == m)
    }
}

#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub company: String,
    pub description: String,
    pub full_description: String,
    pub salary: String,
    pub work_mode: WorkMode,
    pub job_type: JobType,
}

#[derive(Debug, Clone, Default)]
pub struct ApplicationForm {
    pub resume_url: String,
    pub cover_letter_url: String,
    pub linkedin_url: String,
    pub additional_documents_url: String,
    pub notes: String,
}

/// Saved and applied markers for the jobs listing.
#[derive(Debug, Default)]
pub struct JobMarkers {
    pub saved: HashSet<String>,
    pub applied: HashSet<String>,
}

/// Appends every default posting whose id is not in the collection yet.
pub fn seed_jobs(store: &impl RecordStore) -> ActionResult<usize> {
    let mut jobs: Vec<Job> = store::read(store, keys::JOBS)?;
    let missing: Vec<Job> = seed::jobs()
        .into_iter()
        .filter(|d| !jobs.iter().any(|j| j.id == d.id))
        .collect();

    let added = missing.len();
    if added > 0 {
        jobs.extend(missing);
        store::write(store, keys::JOBS, &jobs)?;
        log::debug!("seeded {} default jobs", added);
    }
    Ok(added)
}

pub fn list_jobs(store: &impl RecordStore, filter: JobFilter) -> ActionResult<Vec<Job>> {
    seed_jobs(store)?;
    let jobs: Vec<Job> = store::read(store, keys::JOBS)?;
    Ok(jobs.into_iter().filter(|j| filter.matches(j)).collect())
}

pub fn get_job(store: &impl RecordStore, id: &str) -> ActionResult<Job> {
    let jobs: Vec<Job> = store::read(store, keys::JOBS)?;
    jobs.into_iter()
        .find(|j| j.id == id)
        .ok_or_else(|| PortalError::JobNotFound(id.to_string()))
}

pub fn add_job(store: &impl RecordStore, new_job: NewJob) -> ActionResult<Job> {
    let user = session::require_role(store, "post jobs", &POSTING_ROLES)?;

    require("Title", &new_job.title)?;
    require("Company", &new_job.company)?;
    require("Description", &new_job.description)?;
    require("Full description", &new_job.full_description)?;
    require("Salary", &new_job.salary)?;

    let job = Job {
        id: models::new_id(),
        title: new_job.title,
        company: new_job.company,
        description: new_job.description,
        full_description: new_job.full_description,
        salary: new_job.salary,
        posted_ago: "Just now".to_string(),
        work_mode: new_job.work_mode,
        job_type: new_job.job_type,
    };

    let mut jobs: Vec<Job> = store::read(store, keys::JOBS)?;
    jobs.push(job.clone());
    store::write(store, keys::JOBS, &jobs)?;

    log::info!("user {} posted job {}", user.id, job.id);
    Ok(job)
}

pub fn markers(store: &impl RecordStore) -> ActionResult<JobMarkers> {
    let saved: Vec<Job> = store::read(store, keys::SAVED_JOBS)?;
    let applied = match session::current_user(store)? {
        Some(user) => applications_of(store, &user)?
            .into_iter()
            .map(|a| a.job_id)
            .collect(),
        None => HashSet::new(),
    };
    Ok(JobMarkers {
        saved: saved.into_iter().map(|j| j.id).collect(),
        applied,
    })
}

/// Copies the listing into the saved list. The copy is independent of the
/// canonical posting.
pub fn save_job(store: &impl RecordStore, id: &str) -> ActionResult<Job> {
    let job = get_job(store, id)?;

    let mut saved: Vec<Job> = store::read(store, keys::SAVED_JOBS)?;
    if saved.iter().any(|j| j.id == job.id) {
        return Err(PortalError::AlreadySaved);
    }
    saved.push(job.clone());
    store::write(store, keys::SAVED_JOBS, &saved)?;
    Ok(job)
}

pub fn saved_jobs(store: &impl RecordStore) -> ActionResult<Vec<Job>> {
    Ok(store::read(store, keys::SAVED_JOBS)?)
}

/// Drops the saved copy only. Returns whether anything was removed.
pub fn remove_saved_job(store: &impl RecordStore, id: &str) -> ActionResult<bool> {
    let mut saved: Vec<Job> = store::read(store, keys::SAVED_JOBS)?;
    let before = saved.len();
    saved.retain(|j| j.id != id);
    if saved.len() == before {
        return Ok(false);
    }
    store::write(store, keys::SAVED_JOBS, &saved)?;
    Ok(true)
}

fn applications_of(store: &impl RecordStore, user: &User) -> ActionResult<Vec<JobApplication>> {
    let all: Vec<JobApplication> = store::read(store, keys::APPLIED_JOBS)?;
    Ok(all.into_iter().filter(|a| a.belongs_to(user)).collect())
}

pub fn apply(
    store: &impl RecordStore,
    job_id: &str,
    form: ApplicationForm,
) -> ActionResult<JobApplication> {
    let user = session::require_user(store, "apply for jobs")?;
    let job = get_job(store, job_id)?;
    require("Resume URL", &form.resume_url)?;

    let mut applications: Vec<JobApplication> = store::read(store, keys::APPLIED_JOBS)?;
    if applications
        .iter()
        .any(|a| a.job_id == job.id && a.belongs_to(&user))
    {
        return Err(PortalError::AlreadyApplied);
    }

    let now = models::timestamp();
    let application = JobApplication {
        id: models::new_id(),
        job_id: job.id,
        job_title: job.title,
        applicant_id: Some(user.id.clone()),
        applicant_name: user.full_name(),
        applicant_email: user.email.clone(),
        resume_url: form.resume_url,
        cover_letter_url: form.cover_letter_url,
        linkedin_url: form.linkedin_url,
        additional_documents_url: form.additional_documents_url,
        application_status: ApplicationStatus::UnderReview,
        submitted_at: now.clone(),
        last_updated: now,
        notes: form.notes,
        job_type: job.job_type,
        salary: job.salary,
        work_mode: job.work_mode,
    };

    applications.push(application.clone());
    store::write(store, keys::APPLIED_JOBS, &applications)?;

    log::info!("user {} applied to job {}", user.id, application.job_id);
    Ok(application)
}

pub fn applied_jobs(store: &impl RecordStore) -> ActionResult<Vec<JobApplication>> {
    let user = session::require_user(store, "view your applications")?;
    applications_of(store, &user)
}

pub fn list_applications(
    store: &impl RecordStore,
    status: Option<ApplicationStatus>,
) -> ActionResult<Vec<JobApplication>> {
    session::require_role(store, "manage applications", &POSTING_ROLES)?;
    let all: Vec<JobApplication> = store::read(store, keys::APPLIED_JOBS)?;
    Ok(all
        .into_iter()
        .filter(|a| status.is_none_or(|s| a.application_status == s))
        .collect())
}

pub fn update_application_status(
    store: &impl RecordStore,
    id: &str,
    status: ApplicationStatus,
) -> ActionResult<JobApplication> {
    let user = session::require_role(store, "manage applications", &POSTING_ROLES)?;

    let mut applications: Vec<JobApplication> = store::read(store, keys::APPLIED_JOBS)?;
    let application = applications
        .iter_mut()
        .find(|a| a.id == id)
        .ok_or_else(|| PortalError::ApplicationNotFound(id.to_string()))?;

    application.application_status = status;
    application.last_updated = models::timestamp();
    let updated = application.clone();

    store::write(store, keys::APPLIED_JOBS, &applications)?;
    log::info!("user {} set application {} to {}", user.id, id, status);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{self, tests::student_form};
    use crate::store::MemoryStore;

    fn resume() -> ApplicationForm {
        ApplicationForm {
            resume_url: "https://files.example/cv.pdf".to_string(),
            ..Default::default()
        }
    }

    fn new_job(title: &str) -> NewJob {
        NewJob {
            title: title.to_string(),
            company: "Initech".to_string(),
            description: "Short".to_string(),
            full_description: "Long".to_string(),
            salary: "$90k/yr".to_string(),
            work_mode: WorkMode::Remote,
            job_type: JobType::Job,
        }
    }

    #[test]
    fn test_seeding_adds_only_missing_defaults() {
        let store = MemoryStore::new();
        assert_eq!(seed_jobs(&store).unwrap(), 5);
        assert_eq!(seed_jobs(&store).unwrap(), 0);

        let mut jobs: Vec<Job> = store::read(&store, keys::JOBS).unwrap();
        jobs.retain(|j| j.id != "3");
        store::write(&store, keys::JOBS, &jobs).unwrap();
        assert_eq!(seed_jobs(&store).unwrap(), 1);
    }

    #[test]
    fn test_filter_by_type() {
        let store = MemoryStore::new();
        let internships = list_jobs(
            &store,
            JobFilter {
                job_type: Some(JobType::Internship),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(internships.len(), 2);
        assert!(internships.iter().all(|j| j.job_type == JobType::Internship));
        assert_eq!(list_jobs(&store, JobFilter::default()).unwrap().len(), 5);
    }

    #[test]
    fn test_filter_by_work_mode_and_combined() {
        let store = MemoryStore::new();
        let ids = |filter: JobFilter| -> Vec<String> {
            list_jobs(&store, filter).unwrap().into_iter().map(|j| j.id).collect()
        };

        let remote = JobFilter {
            work_mode: Some(WorkMode::Remote),
            ..Default::default()
        };
        assert_eq!(ids(remote), vec!["2"]);

        let onsite_internships = JobFilter {
            job_type: Some(JobType::Internship),
            work_mode: Some(WorkMode::Onsite),
        };
        assert_eq!(ids(onsite_internships), vec!["4"]);

        let remote_internships = JobFilter {
            job_type: Some(JobType::Internship),
            work_mode: Some(WorkMode::Remote),
        };
        assert!(ids(remote_internships).is_empty());
    }

    #[test]
    fn test_saving_twice_does_not_duplicate() {
        let store = MemoryStore::new();
        seed_jobs(&store).unwrap();
        save_job(&store, "2").unwrap();
        assert!(matches!(save_job(&store, "2"), Err(PortalError::AlreadySaved)));
        assert_eq!(saved_jobs(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_remove_saved_keeps_canonical_listing() {
        let store = MemoryStore::new();
        seed_jobs(&store).unwrap();
        save_job(&store, "1").unwrap();
        save_job(&store, "4").unwrap();

        assert!(remove_saved_job(&store, "1").unwrap());
        assert!(!remove_saved_job(&store, "1").unwrap());

        let saved: Vec<String> = saved_jobs(&store).unwrap().into_iter().map(|j| j.id).collect();
        assert_eq!(saved, vec!["4"]);
        assert!(get_job(&store, "1").is_ok());
    }

    #[test]
    fn test_unknown_job_reference() {
        let store = MemoryStore::new();
        seed_jobs(&store).unwrap();
        assert!(matches!(save_job(&store, "404"), Err(PortalError::JobNotFound(_))));
    }

    #[test]
    fn test_apply_twice_rejected() {
        let store = MemoryStore::new();
        seed_jobs(&store).unwrap();
        auth::login(&store, "student@app.com", "password").unwrap();

        let app = apply(&store, "1", resume()).unwrap();
        assert_eq!(app.application_status, ApplicationStatus::UnderReview);
        assert_eq!(app.applicant_name, "Student User");
        assert_eq!(app.submitted_at, app.last_updated);

        assert!(matches!(
            apply(&store, "1", resume()),
            Err(PortalError::AlreadyApplied)
        ));
        assert_eq!(applied_jobs(&store).unwrap().len(), 1);
    }

    #[test]
    fn test_applications_are_per_user() {
        let store = MemoryStore::new();
        seed_jobs(&store).unwrap();
        auth::login(&store, "student@app.com", "password").unwrap();
        apply(&store, "1", resume()).unwrap();

        auth::register(&store, student_form("other@x.com")).unwrap();
        auth::login(&store, "other@x.com", "hunter22").unwrap();
        assert!(applied_jobs(&store).unwrap().is_empty());
        apply(&store, "1", resume()).unwrap();

        let marks = markers(&store).unwrap();
        assert!(marks.applied.contains("1"));
        assert_eq!(marks.applied.len(), 1);
    }

    #[test]
    fn test_apply_requires_login_and_resume() {
        let store = MemoryStore::new();
        seed_jobs(&store).unwrap();
        assert!(matches!(
            apply(&store, "1", resume()),
            Err(PortalError::NotLoggedIn(_))
        ));

        auth::login(&store, "student@app.com", "password").unwrap();
        assert!(matches!(
            apply(&store, "1", ApplicationForm::default()),
            Err(PortalError::MissingField("Resume URL"))
        ));
    }

    #[test]
    fn test_only_employers_post_and_manage() {
        let store = MemoryStore::new();
        seed_jobs(&store).unwrap();
        auth::login(&store, "student@app.com", "password").unwrap();
        assert!(matches!(
            add_job(&store, new_job("Analyst")),
            Err(PortalError::Forbidden { .. })
        ));
        let app = apply(&store, "5", resume()).unwrap();

        auth::login(&store, "employer@app.com", "password").unwrap();
        let posted = add_job(&store, new_job("Analyst")).unwrap();
        assert_eq!(posted.posted_ago, "Just now");
        assert_eq!(get_job(&store, &posted.id).unwrap(), posted);

        let updated =
            update_application_status(&store, &app.id, ApplicationStatus::InterviewScheduled)
                .unwrap();
        assert_eq!(updated.application_status, ApplicationStatus::InterviewScheduled);

        let scheduled =
            list_applications(&store, Some(ApplicationStatus::InterviewScheduled)).unwrap();
        assert_eq!(scheduled.len(), 1);
        assert!(list_applications(&store, Some(ApplicationStatus::Hired))
            .unwrap()
            .is_empty());

        assert!(matches!(
            update_application_status(&store, "missing", ApplicationStatus::Hired),
            Err(PortalError::ApplicationNotFound(_))
        ));
    }

    #[test]
    fn test_add_job_requires_fields() {
        let store = MemoryStore::new();
        auth::login(&store, "employer@app.com", "password").unwrap();
        let mut job = new_job("Analyst");
        job.salary.clear();
        assert!(matches!(
            add_job(&store, job),
            Err(PortalError::MissingField("Salary"))
        ));
    }
}
