mod auth;
mod config;
mod db;
mod error;
mod events;
mod jobs;
mod logging;
mod mentors;
mod models;
mod network;
mod profile;
mod seed;
mod session;
mod store;
mod tui;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use config::Config;
use db::Database;
use error::{ActionResult, PortalError};
use models::{ApplicationStatus, EventType, JobType, UserRole, WorkMode};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "growthlink")]
#[command(about = "Campus community platform - jobs, events, mentorship and networking")]
struct Cli {
    /// Path to the record store (overrides GROWTHLINK_STORE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm_password: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: String,
        #[arg(long)]
        phone: String,
        #[arg(long)]
        street: String,
        #[arg(long)]
        city: String,
        #[arg(long, default_value = "")]
        state: String,
        #[arg(long)]
        zipcode: String,
        #[arg(long, value_enum, default_value_t = UserRole::Student)]
        role: UserRole,
    },

    /// Sign in
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show who is signed in
    Whoami,

    /// View or edit your profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Job and internship listings
    Jobs {
        #[command(subcommand)]
        command: JobCommands,
    },

    /// Academic events and reservations
    Events {
        #[command(subcommand)]
        command: EventCommands,
    },

    /// Mentors and mentorship applications
    Mentors {
        #[command(subcommand)]
        command: MentorCommands,
    },

    /// Follow other users
    Network {
        #[command(subcommand)]
        command: NetworkCommands,
    },

    /// Dump every stored record as JSON
    Export,
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Show your profile
    Show,

    /// Update profile fields
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        street: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long)]
        zipcode: Option<String>,
        /// Receive notifications via email (true/false)
        #[arg(long)]
        email_notifications: Option<bool>,
    },
}

#[derive(Subcommand)]
enum JobCommands {
    /// List openings
    List {
        #[arg(short = 't', long = "type", value_enum)]
        job_type: Option<JobType>,

        #[arg(short = 'm', long = "mode", value_enum)]
        work_mode: Option<WorkMode>,
    },

    /// Show one opening
    Show { id: String },

    /// Browse openings interactively
    Browse {
        #[arg(short = 't', long = "type", value_enum)]
        job_type: Option<JobType>,
    },

    /// Post an opening (employers)
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        full_description: String,
        #[arg(long)]
        salary: String,
        #[arg(long = "mode", value_enum, default_value_t = WorkMode::Onsite)]
        work_mode: WorkMode,
        #[arg(long = "type", value_enum, default_value_t = JobType::Job)]
        job_type: JobType,
    },

    /// Add an opening to the saved list
    Save { id: String },

    /// List saved openings
    Saved,

    /// Remove an opening from the saved list
    Unsave { id: String },

    /// Apply to an opening
    Apply {
        id: String,
        #[arg(long)]
        resume: String,
        #[arg(long, default_value = "")]
        cover_letter: String,
        #[arg(long, default_value = "")]
        linkedin: String,
        #[arg(long, default_value = "")]
        documents: String,
        #[arg(long, default_value = "")]
        notes: String,
    },

    /// List your applications
    Applied,

    /// List all applications (employers)
    Applications {
        #[arg(short, long, value_enum)]
        status: Option<ApplicationStatus>,
    },

    /// Change an application's status (employers)
    Status {
        id: String,
        #[arg(value_enum)]
        status: ApplicationStatus,
    },
}

#[derive(Subcommand)]
enum EventCommands {
    /// List events
    List {
        #[arg(short = 't', long = "type", value_enum)]
        event_type: Option<EventType>,

        /// Only events starting or ending on this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show an event and its sessions
    Show { id: String },

    /// Add an event (organizers)
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long = "type", value_enum)]
        event_type: EventType,
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        end_date: String,
        #[arg(long)]
        location: String,
        #[arg(long)]
        is_virtual: bool,
        #[arg(long)]
        max_attendees: u32,
        #[arg(long)]
        registration_deadline: String,
        /// Repeatable: "title|description|start|end|location|max"
        #[arg(long = "session")]
        sessions: Vec<events::SessionForm>,
    },

    /// Reserve a seat in a session
    Register { event_id: String, session_id: String },

    /// List your reservations
    Reservations,

    /// Cancel a reservation
    Cancel { id: String },
}

#[derive(Subcommand)]
enum MentorCommands {
    /// List mentors
    List,

    /// Sign up as a mentor
    Become {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        company: String,
        /// Comma separated
        #[arg(long)]
        expertise: String,
        #[arg(long)]
        bio: String,
        #[arg(long, default_value = "")]
        image_url: String,
    },

    /// Apply for mentorship
    Apply {
        /// Mentor id
        #[arg(long)]
        mentor: String,
        #[arg(long)]
        message: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },

    /// List mentorship applications
    Applications,
}

#[derive(Subcommand)]
enum NetworkCommands {
    /// List other users
    Users,

    /// Follow a user
    Follow { user_id: String },

    /// Stop following a user
    Unfollow { user_id: String },

    /// Users you follow
    Following,

    /// Users who follow you
    Followers,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose)?;

    let config = Config::load(cli.store);
    let db = Database::open(&config.store_path)?;
    if let Some(path) = db.path() {
        log::debug!("using store at {}", path.display());
    }

    match dispatch(&db, cli.command) {
        Ok(()) => Ok(()),
        Err(PortalError::Store(e)) => Err(e),
        Err(e) => {
            eprintln!("{}: {}", e.title(), e);
            std::process::exit(1);
        }
    }
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

fn dispatch(db: &Database, command: Commands) -> ActionResult<()> {
    match command {
        Commands::Register {
            email,
            password,
            confirm_password,
            first_name,
            last_name,
            dob,
            phone,
            street,
            city,
            state,
            zipcode,
            role,
        } => {
            let form = auth::RegistrationForm {
                email,
                password,
                confirm_password,
                first_name,
                last_name,
                dob,
                phone_no: phone,
                street,
                city,
                state,
                zipcode,
                role,
            };
            let user = auth::register(db, form)?;
            println!("You have successfully registered (user #{}). Log in with 'growthlink login {}'.", user.id, user.email);
        }

        Commands::Login { email, password } => {
            let user = auth::login(db, &email, &password)?;
            println!("Welcome to GrowthLink, {}!", user.full_name());
        }

        Commands::Logout => {
            auth::logout(db)?;
            println!("Logged out.");
        }

        Commands::Whoami => match session::current_user(db)? {
            Some(user) => {
                let mentor = if mentors::is_mentor(db, &user)? { ", mentor" } else { "" };
                println!("{} <{}> (#{}, {}{})", user.full_name(), user.email, user.id, user.role, mentor);
            }
            None => println!("Not logged in."),
        },

        Commands::Profile { command } => run_profile(db, command)?,
        Commands::Jobs { command } => run_jobs(db, command)?,
        Commands::Events { command } => run_events(db, command)?,
        Commands::Mentors { command } => run_mentors(db, command)?,
        Commands::Network { command } => run_network(db, command)?,

        Commands::Export => {
            let dump = store::snapshot(db)?;
            let text = serde_json::to_string_pretty(&dump).map_err(anyhow::Error::from)?;
            println!("{}", text);
        }
    }

    Ok(())
}

fn run_profile(db: &Database, command: ProfileCommands) -> ActionResult<()> {
    match command {
        ProfileCommands::Show => {
            let user = profile::show(db)?;
            println!("User #{} ({})", user.id, user.role);
            println!("Name: {}", user.full_name());
            println!("Email: {}", user.email);
            println!("Date of birth: {}", user.dob);
            println!("Phone: {}", user.phone_no);
            println!("Address: {}, {}, {} {}", user.street, user.city, user.state, user.zipcode);
            println!(
                "Email notifications: {}",
                if profile::wants_email_notifications(&user) { "on" } else { "off" }
            );
        }

        ProfileCommands::Update {
            first_name,
            last_name,
            email,
            password,
            dob,
            phone,
            street,
            city,
            state,
            zipcode,
            email_notifications,
        } => {
            let changes = profile::ProfileChanges {
                first_name,
                last_name,
                email,
                password,
                dob,
                phone_no: phone,
                street,
                city,
                state,
                zipcode,
                email_notifications,
            };
            if changes.is_empty() {
                println!("Nothing to update.");
                return Ok(());
            }
            profile::update_profile(db, changes)?;
            println!("Your profile information has been successfully updated.");
        }
    }
    Ok(())
}

fn print_job_rows(jobs: &[models::Job], markers: &jobs::JobMarkers) {
    println!("{:<38} {:<2} {:<30} {:<18} {:<11} {:<7} {:>10}", "ID", "", "TITLE", "COMPANY", "TYPE", "MODE", "SALARY");
    println!("{}", "-".repeat(122));
    for job in jobs {
        let mut flags = String::new();
        flags.push(if markers.saved.contains(&job.id) { '*' } else { ' ' });
        flags.push(if markers.applied.contains(&job.id) { '+' } else { ' ' });
        println!(
            "{:<38} {:<2} {:<30} {:<18} {:<11} {:<7} {:>10}",
            job.id,
            flags,
            truncate(&job.title, 28),
            truncate(&job.company, 16),
            job.job_type,
            job.work_mode,
            job.salary
        );
    }
}

fn run_jobs(db: &Database, command: JobCommands) -> ActionResult<()> {
    match command {
        JobCommands::List { job_type, work_mode } => {
            let jobs = jobs::list_jobs(db, jobs::JobFilter { job_type, work_mode })?;
            if jobs.is_empty() {
                println!("No jobs found.");
            } else {
                print_job_rows(&jobs, &jobs::markers(db)?);
            }
        }

        JobCommands::Show { id } => {
            jobs::seed_jobs(db)?;
            let job = jobs::get_job(db, &id)?;
            println!("{}", job.title);
            println!("Company: {}", job.company);
            println!("Type: {} ({})", job.job_type, job.work_mode);
            println!("Salary: {}", job.salary);
            println!("Posted: {}", job.posted_ago);
            println!("\n{}", textwrap::fill(&job.full_description, 80));
        }

        JobCommands::Browse { job_type } => {
            tui::run_browse(db, job_type)?;
        }

        JobCommands::Add {
            title,
            company,
            description,
            full_description,
            salary,
            work_mode,
            job_type,
        } => {
            let job = jobs::add_job(
                db,
                jobs::NewJob {
                    title,
                    company,
                    description,
                    full_description,
                    salary,
                    work_mode,
                    job_type,
                },
            )?;
            println!("Your job has been successfully added (#{}).", job.id);
        }

        JobCommands::Save { id } => {
            jobs::seed_jobs(db)?;
            let job = jobs::save_job(db, &id)?;
            println!("'{}' has been added to your saved list.", job.title);
        }

        JobCommands::Saved => {
            let saved = jobs::saved_jobs(db)?;
            if saved.is_empty() {
                println!("You haven't saved any jobs yet.");
            } else {
                print_job_rows(&saved, &jobs::markers(db)?);
            }
        }

        JobCommands::Unsave { id } => {
            if jobs::remove_saved_job(db, &id)? {
                println!("The job has been removed from your saved list.");
            } else {
                println!("Job '{}' is not in your saved list.", id);
            }
        }

        JobCommands::Apply {
            id,
            resume,
            cover_letter,
            linkedin,
            documents,
            notes,
        } => {
            jobs::seed_jobs(db)?;
            let form = jobs::ApplicationForm {
                resume_url: resume,
                cover_letter_url: cover_letter,
                linkedin_url: linkedin,
                additional_documents_url: documents,
                notes,
            };
            let application = jobs::apply(db, &id, form)?;
            println!("Your application has been successfully submitted (#{}).", application.id);
        }

        JobCommands::Applied => {
            let applications = jobs::applied_jobs(db)?;
            if applications.is_empty() {
                println!("You haven't applied to any jobs yet.");
            } else {
                print_applications(&applications);
            }
        }

        JobCommands::Applications { status } => {
            let applications = jobs::list_applications(db, status)?;
            if applications.is_empty() {
                println!("No applications found.");
            } else {
                print_applications(&applications);
            }
        }

        JobCommands::Status { id, status } => {
            let application = jobs::update_application_status(db, &id, status)?;
            println!(
                "Application from {} for '{}' is now {}.",
                application.applicant_name, application.job_title, application.application_status
            );
        }
    }
    Ok(())
}

fn print_applications(applications: &[models::JobApplication]) {
    println!("{:<38} {:<26} {:<22} {:<20} {:<10}", "ID", "JOB", "APPLICANT", "STATUS", "SUBMITTED");
    println!("{}", "-".repeat(120));
    for app in applications {
        println!(
            "{:<38} {:<26} {:<22} {:<20} {:<10}",
            app.id,
            truncate(&app.job_title, 24),
            truncate(&app.applicant_name, 20),
            app.application_status.to_string(),
            truncate(&app.submitted_at, 10)
        );
    }
}

fn run_events(db: &Database, command: EventCommands) -> ActionResult<()> {
    events::seed_events(db, today())?;

    match command {
        EventCommands::List { event_type, date } => {
            let list = events::list_events(db, events::EventFilter { event_type, date })?;
            if list.is_empty() {
                println!("No events found.");
                return Ok(());
            }
            let registered = events::registered_sessions(db)?;
            for event in list {
                println!(
                    "#{} {} [{}] {} - {} @ {}{}",
                    event.id,
                    event.title,
                    event.event_type,
                    event.start_date,
                    event.end_date,
                    event.location,
                    if event.is_virtual { " (virtual)" } else { "" }
                );
                for s in &event.sessions {
                    let mark = if registered.contains(&s.id) { " (registered)" } else { "" };
                    println!("    session {}: {} {} - {}{}", s.id, s.title, s.start_time, s.end_time, mark);
                }
            }
        }

        EventCommands::Show { id } => {
            let event = events::get_event(db, &id)?;
            println!("{} ({}, {})", event.title, event.event_type, event.status);
            println!("{}", event.description);
            println!("When: {} to {}", event.start_date, event.end_date);
            println!("Where: {}{}", event.location, if event.is_virtual { " (virtual)" } else { "" });
            println!("Capacity: {}  Register by: {}", event.max_attendees, event.registration_deadline);
            println!("\nSessions ({}):", event.sessions.len());
            for s in &event.sessions {
                println!("  #{} {}", s.id, s.title);
                println!("      {} - {} @ {} (max {})", s.start_time, s.end_time, s.location, s.max_attendees);
                println!("      {}", s.description);
            }
        }

        EventCommands::Add {
            title,
            description,
            event_type,
            start_date,
            end_date,
            location,
            is_virtual,
            max_attendees,
            registration_deadline,
            sessions,
        } => {
            let event = events::add_event(
                db,
                events::NewEvent {
                    title,
                    description,
                    event_type,
                    start_date,
                    end_date,
                    location,
                    is_virtual,
                    max_attendees,
                    registration_deadline,
                    sessions,
                },
            )?;
            println!("Your event has been successfully added (#{}).", event.id);
        }

        EventCommands::Register { event_id, session_id } => {
            let reservation = events::register_for_session(db, &event_id, &session_id)?;
            println!("You have been registered for the session: {}", reservation.session_title);
        }

        EventCommands::Reservations => {
            let list = events::reservations(db)?;
            if list.is_empty() {
                println!("You don't have any reservations yet.");
            }
            for r in list {
                println!("#{} {} / {}", r.id, r.event_title, r.session_title);
                println!("    {} - {} @ {}", r.session_start_time, r.session_end_time, r.session_location);
            }
        }

        EventCommands::Cancel { id } => {
            events::cancel_reservation(db, &id)?;
            println!("Your reservation has been successfully cancelled.");
        }
    }
    Ok(())
}

fn run_mentors(db: &Database, command: MentorCommands) -> ActionResult<()> {
    match command {
        MentorCommands::List => {
            for m in mentors::list_mentors(db)? {
                println!("#{} {} - {} at {}", m.id, m.name, m.title, m.company);
                println!("    {}", m.expertise.join(", "));
            }
        }

        MentorCommands::Become {
            name,
            title,
            company,
            expertise,
            bio,
            image_url,
        } => {
            let form = mentors::MentorProfileForm {
                name,
                title,
                company,
                expertise,
                bio,
                image_url,
            };
            mentors::become_mentor(db, form)?;
            println!("Your mentor application has been successfully submitted.");
        }

        MentorCommands::Apply {
            mentor,
            message,
            name,
            email,
        } => {
            let request = mentors::MentorshipRequest {
                name,
                email,
                mentor,
                message,
            };
            mentors::apply_for_mentorship(db, request)?;
            println!("Your mentorship application has been successfully submitted.");
        }

        MentorCommands::Applications => {
            let applications = mentors::mentorship_applications(db)?;
            if applications.is_empty() {
                println!("No mentorship applications yet.");
            }
            for (app, mentor) in applications {
                let mentor_name = mentor.map(|m| m.name).unwrap_or_else(|| format!("unknown mentor #{}", app.mentor));
                println!("{} <{}> -> {} ({})", app.name, app.email, mentor_name, truncate(&app.submitted_at, 10));
                println!("    {}", app.message);
            }
        }
    }
    Ok(())
}

fn run_network(db: &Database, command: NetworkCommands) -> ActionResult<()> {
    match command {
        NetworkCommands::Users => {
            for (user, followed) in network::directory(db)? {
                let mark = if followed { " (following)" } else { "" };
                println!("#{:<4} {:<24} {:<10}{}", user.id, truncate(&user.full_name(), 22), user.role, mark);
            }
        }

        NetworkCommands::Follow { user_id } => {
            if network::follow(db, &user_id)? {
                println!("You are now following user #{}.", user_id);
            } else {
                println!("You already follow user #{}.", user_id);
            }
        }

        NetworkCommands::Unfollow { user_id } => {
            if network::unfollow(db, &user_id)? {
                println!("You have unfollowed user #{}.", user_id);
            } else {
                println!("You were not following user #{}.", user_id);
            }
        }

        NetworkCommands::Following => {
            let users = network::following(db)?;
            if users.is_empty() {
                println!("You are not following anyone yet.");
            }
            for user in users {
                println!("#{:<4} {} ({})", user.id, user.full_name(), user.role);
            }
        }

        NetworkCommands::Followers => {
            let users = network::followers(db)?;
            if users.is_empty() {
                println!("You don't have any followers yet.");
            }
            for user in users {
                println!("#{:<4} {} ({})", user.id, user.full_name(), user.role);
            }
        }
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let head: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
