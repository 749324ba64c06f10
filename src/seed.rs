use chrono::{Days, NaiveDate};

use crate::models::{
    AcademicEvent, EventSession, EventType, Job, JobType, Mentor, User, UserRole, WorkMode,
};

/// One account per role, all with the password `password`.
pub fn users() -> Vec<User> {
    let account = |id: &str,
                   first: &str,
                   email: &str,
                   dob: &str,
                   phone: &str,
                   street: &str,
                   state: &str,
                   zipcode: &str,
                   role: UserRole| User {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: "User".to_string(),
        email: email.to_string(),
        password: "password".to_string(),
        dob: dob.to_string(),
        phone_no: phone.to_string(),
        street: street.to_string(),
        city: format!("{} City", first),
        state: state.to_string(),
        zipcode: zipcode.to_string(),
        role,
        notification_preferences: Vec::new(),
    };

    vec![
        account("1", "Admin", "admin@app.com", "1990-01-01", "1234567890", "123 Admin St", "CA", "12345", UserRole::Admin),
        account("2", "Employer", "employer@app.com", "1985-05-15", "2345678901", "456 Employer Ave", "NY", "23456", UserRole::Employer),
        account("3", "Organizer", "organizer@app.com", "1988-09-20", "3456789012", "789 Organizer Blvd", "TX", "34567", UserRole::Organizer),
        account("4", "Mentor", "mentor@app.com", "1982-03-10", "4567890123", "101 Mentor Rd", "FL", "45678", UserRole::Mentor),
        account("5", "Student", "student@app.com", "2000-07-30", "5678901234", "202 Student Ln", "IL", "56789", UserRole::Student),
    ]
}

pub fn jobs() -> Vec<Job> {
    let posting = |id: &str,
                   title: &str,
                   company: &str,
                   description: &str,
                   full_description: String,
                   salary: &str,
                   posted_ago: &str,
                   work_mode: WorkMode,
                   job_type: JobType| Job {
        id: id.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        description: description.to_string(),
        full_description,
        salary: salary.to_string(),
        posted_ago: posted_ago.to_string(),
        work_mode,
        job_type,
    };

    let engineering = |role: &str, company: &str| {
        format!(
            "We are looking for a skilled {role} to join our team at {company}. The ideal \
             candidate will have 5+ years of experience in React and Node.js, with a strong \
             background in building scalable web applications. You'll collaborate with \
             cross-functional teams to design, implement, and optimize new features, ensuring \
             high performance and reliability. If you're ready to take on exciting challenges \
             and grow your career, we encourage you to apply for this position."
        )
    };

    vec![
        posting("1", "Full Stack Developer", "Google", "We are looking for a skilled Full Stack developer...", engineering("Full Stack developer", "Google"), "$140k/yr", "5 hours ago", WorkMode::Onsite, JobType::Job),
        posting("2", "Software Engineer", "Microsoft", "We are looking for a skilled Software Engineer...", engineering("Software Engineer", "Microsoft"), "$120k/yr", "3 hours ago", WorkMode::Remote, JobType::Job),
        posting("3", "Data Scientist", "Amazon", "We are looking for a skilled Data Scientist...", engineering("Data Scientist", "Amazon"), "$150k/yr", "2 hours ago", WorkMode::Onsite, JobType::Job),
        posting(
            "4",
            "Software Engineering Intern",
            "Facebook",
            "We are seeking a talented Software Engineering Intern...",
            "We are seeking a talented Software Engineering Intern to join our team at Facebook \
             for a summer internship. The ideal candidate will be pursuing a degree in Computer \
             Science or a related field, with strong programming skills in languages such as \
             Python, Java, or C++. You'll collaborate with experienced engineers, learn about \
             large-scale systems, and contribute to the development of innovative features."
                .to_string(),
            "$30/hr",
            "1 day ago",
            WorkMode::Onsite,
            JobType::Internship,
        ),
        posting(
            "5",
            "Data Science Intern",
            "Netflix",
            "Join our Data Science team as an intern...",
            "Join our Data Science team as an intern at Netflix and dive into the world of big \
             data and machine learning. As a Data Science Intern, you'll work on projects that \
             help shape our content recommendations, optimize streaming quality, and improve \
             user experience. You should have a strong foundation in statistical analysis, \
             machine learning algorithms, and programming languages such as Python or R."
                .to_string(),
            "$28/hr",
            "2 days ago",
            WorkMode::Hybrid,
            JobType::Internship,
        ),
    ]
}

/// Listed ahead of every registered mentor; never written to the store.
pub fn mentors() -> Vec<Mentor> {
    let mentor = |id: &str, name: &str, title: &str, company: &str, expertise: [&str; 3], bio: &str, img: u8| Mentor {
        id: id.to_string(),
        name: name.to_string(),
        title: title.to_string(),
        company: company.to_string(),
        expertise: expertise.iter().map(|s| s.to_string()).collect(),
        bio: bio.to_string(),
        image_url: format!("https://i.pravatar.cc/150?img={}", img),
    };

    vec![
        mentor(
            "1",
            "Dr. Emily Chen",
            "Senior Data Scientist",
            "TechCorp",
            ["Machine Learning", "AI Ethics", "Data Visualization"],
            "With over 10 years of experience in data science, Dr. Chen specializes in developing ethical AI solutions.",
            1,
        ),
        mentor(
            "2",
            "Michael Rodriguez",
            "Full Stack Developer",
            "WebSolutions Inc.",
            ["React", "Node.js", "Cloud Architecture"],
            "Michael is passionate about building scalable web applications and mentoring junior developers.",
            3,
        ),
        mentor(
            "3",
            "Sarah Johnson",
            "UX/UI Design Lead",
            "DesignMasters",
            ["User Research", "Interaction Design", "Accessibility"],
            "Sarah has a keen eye for design and a deep understanding of user-centered design principles.",
            5,
        ),
    ]
}

/// Default events, dated relative to `today`.
pub fn events(today: NaiveDate) -> Vec<AcademicEvent> {
    let tomorrow = today.checked_add_days(Days::new(1)).unwrap_or(today);
    let day = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
    let at = |d: NaiveDate, time: &str| format!("{}T{}", day(d), time);

    let session = |id: &str, event_id: &str, title: &str, description: &str, start: String, end: String, location: &str, max: u32| EventSession {
        id: id.to_string(),
        event_id: event_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        start_time: start,
        end_time: end,
        location: location.to_string(),
        max_attendees: max,
    };

    vec![
        AcademicEvent {
            id: "1".to_string(),
            title: "AI in Academia Conference 2024".to_string(),
            description: "Annual gathering of AI researchers and academics.".to_string(),
            event_type: EventType::Conference,
            start_date: day(today),
            end_date: day(tomorrow),
            location: "Stanford University, CA".to_string(),
            is_virtual: false,
            max_attendees: 500,
            registration_deadline: day(today),
            status: "Upcoming".to_string(),
            sessions: vec![
                session(
                    "101",
                    "1",
                    "Keynote: Future of AI in Education",
                    "Opening keynote discussing the impact of AI on education.",
                    at(today, "09:00:00"),
                    at(today, "10:30:00"),
                    "Main Auditorium",
                    500,
                ),
                session(
                    "102",
                    "1",
                    "Workshop: Implementing AI in Curriculum",
                    "Hands-on workshop on integrating AI into academic curricula.",
                    at(today, "11:00:00"),
                    at(today, "13:00:00"),
                    "Workshop Room A",
                    50,
                ),
            ],
        },
        AcademicEvent {
            id: "2".to_string(),
            title: "Data Science in Research Symposium".to_string(),
            description: "Exploring the role of data science in academic research.".to_string(),
            event_type: EventType::Conference,
            start_date: day(today),
            end_date: day(tomorrow),
            location: "MIT, Cambridge, MA".to_string(),
            is_virtual: false,
            max_attendees: 300,
            registration_deadline: day(today),
            status: "Upcoming".to_string(),
            sessions: vec![session(
                "201",
                "2",
                "Data Visualization Techniques",
                "Advanced techniques for visualizing complex research data.",
                at(today, "10:00:00"),
                at(today, "12:00:00"),
                "Lecture Hall 1",
                100,
            )],
        },
        AcademicEvent {
            id: "3".to_string(),
            title: "Academic Writing Workshop".to_string(),
            description: "Improving academic writing skills for researchers and students.".to_string(),
            event_type: EventType::Workshop,
            start_date: day(tomorrow),
            end_date: day(tomorrow),
            location: "Online".to_string(),
            is_virtual: true,
            max_attendees: 100,
            registration_deadline: day(today),
            status: "Upcoming".to_string(),
            sessions: vec![session(
                "301",
                "3",
                "Effective Academic Writing Techniques",
                "Learn strategies for clear and impactful academic writing.",
                at(tomorrow, "14:00:00"),
                at(tomorrow, "16:00:00"),
                "Virtual Room 1",
                100,
            )],
        },
    ]
}
