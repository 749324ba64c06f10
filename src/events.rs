use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{ActionResult, PortalError, require};
use crate::models::{self, AcademicEvent, EventReservation, EventSession, EventType, UserRole};
use crate::seed;
use crate::session;
use crate::store::{self, RecordStore, keys};

const ORGANIZER_ROLES: [UserRole; 2] = [UserRole::Organizer, UserRole::Admin];
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, Default)]
pub struct EventFilter {
    pub event_type: Option<EventType>,
    /// Calendar day; an event shows on the day it starts and the day it ends.
    pub date: Option<NaiveDate>,
}

impl EventFilter {
    fn matches(&self, event: &AcademicEvent) -> bool {
        let type_ok = self.event_type.is_none_or(|t| event.event_type == t);
        let date_ok = self.date.is_none_or(|day| {
            [&event.start_date, &event.end_date]
                .iter()
                .any(|d| NaiveDate::parse_from_str(d, DATE_FORMAT).ok() == Some(day))
        });
        type_ok && date_ok
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionForm {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub location: String,
    pub max_attendees: u32,
}

/// `title|description|start|end|location|max attendees`
impl FromStr for SessionForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').map(str::trim).collect();
        let [title, description, start, end, location, max] = parts.as_slice() else {
            return Err(format!(
                "expected 6 '|'-separated fields (title|description|start|end|location|max), got {}",
                parts.len()
            ));
        };
        let max_attendees = max
            .parse()
            .map_err(|e| format!("bad max attendees '{}': {}", max, e))?;
        Ok(SessionForm {
            title: title.to_string(),
            description: description.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            location: location.to_string(),
            max_attendees,
        })
    }
}

#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub event_type: EventType,
    pub start_date: String,
    pub end_date: String,
    pub location: String,
    pub is_virtual: bool,
    pub max_attendees: u32,
    pub registration_deadline: String,
    pub sessions: Vec<SessionForm>,
}

fn parse_date(field: &'static str, value: &str) -> ActionResult<NaiveDate> {
    require(field, value)?;
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e| PortalError::InvalidField {
        field,
        reason: format!("'{}' is not a YYYY-MM-DD date ({})", value, e),
    })
}

fn parse_time(field: &'static str, value: &str) -> ActionResult<NaiveDateTime> {
    require(field, value)?;
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, TIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M"))
        .map_err(|e| PortalError::InvalidField {
            field,
            reason: format!("'{}' is not a YYYY-MM-DDTHH:MM time ({})", value, e),
        })
}

fn at_least_one(field: &'static str, value: u32) -> ActionResult<()> {
    if value == 0 {
        return Err(PortalError::InvalidField {
            field,
            reason: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn build_session(event_id: &str, form: SessionForm) -> ActionResult<EventSession> {
    require("Session title", &form.title)?;
    require("Session description", &form.description)?;
    require("Session location", &form.location)?;
    let start = parse_time("Session start time", &form.start_time)?;
    let end = parse_time("Session end time", &form.end_time)?;
    if end <= start {
        return Err(PortalError::InvalidField {
            field: "Session end time",
            reason: "must be after the start time".to_string(),
        });
    }
    at_least_one("Session max attendees", form.max_attendees)?;

    Ok(EventSession {
        id: models::new_id(),
        event_id: event_id.to_string(),
        title: form.title,
        description: form.description,
        start_time: start.format(TIME_FORMAT).to_string(),
        end_time: end.format(TIME_FORMAT).to_string(),
        location: form.location,
        max_attendees: form.max_attendees,
    })
}

/// Writes the default events only when none are stored, so events added by
/// organizers survive.
pub fn seed_events(store: &impl RecordStore, today: NaiveDate) -> ActionResult<bool> {
    let existing: Vec<AcademicEvent> = store::read(store, keys::ACADEMIC_EVENTS)?;
    if !existing.is_empty() {
        return Ok(false);
    }
    store::write(store, keys::ACADEMIC_EVENTS, &seed::events(today))?;
    log::debug!("seeded default events for {}", today);
    Ok(true)
}

pub fn list_events(store: &impl RecordStore, filter: EventFilter) -> ActionResult<Vec<AcademicEvent>> {
    let events: Vec<AcademicEvent> = store::read(store, keys::ACADEMIC_EVENTS)?;
    Ok(events.into_iter().filter(|e| filter.matches(e)).collect())
}

pub fn get_event(store: &impl RecordStore, id: &str) -> ActionResult<AcademicEvent> {
    let events: Vec<AcademicEvent> = store::read(store, keys::ACADEMIC_EVENTS)?;
    events
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| PortalError::EventNotFound(id.to_string()))
}

pub fn add_event(store: &impl RecordStore, new_event: NewEvent) -> ActionResult<AcademicEvent> {
    let user = session::require_role(store, "add events", &ORGANIZER_ROLES)?;

    require("Title", &new_event.title)?;
    require("Description", &new_event.description)?;
    require("Location", &new_event.location)?;
    let start = parse_date("Start date", &new_event.start_date)?;
    let end = parse_date("End date", &new_event.end_date)?;
    if end < start {
        return Err(PortalError::InvalidField {
            field: "End date",
            reason: "must not be before the start date".to_string(),
        });
    }
    let deadline = parse_date("Registration deadline", &new_event.registration_deadline)?;
    at_least_one("Max attendees", new_event.max_attendees)?;
    if new_event.sessions.is_empty() {
        return Err(PortalError::MissingField("Session"));
    }

    let id = models::new_id();
    let sessions = new_event
        .sessions
        .into_iter()
        .map(|s| build_session(&id, s))
        .collect::<ActionResult<Vec<_>>>()?;

    let event = AcademicEvent {
        id,
        title: new_event.title,
        description: new_event.description,
        event_type: new_event.event_type,
        start_date: start.format(DATE_FORMAT).to_string(),
        end_date: end.format(DATE_FORMAT).to_string(),
        location: new_event.location,
        is_virtual: new_event.is_virtual,
        max_attendees: new_event.max_attendees,
        registration_deadline: deadline.format(DATE_FORMAT).to_string(),
        status: "Upcoming".to_string(),
        sessions,
    };

    let mut events: Vec<AcademicEvent> = store::read(store, keys::ACADEMIC_EVENTS)?;
    events.push(event.clone());
    store::write(store, keys::ACADEMIC_EVENTS, &events)?;

    log::info!("user {} added event {}", user.id, event.id);
    Ok(event)
}

pub fn register_for_session(
    store: &impl RecordStore,
    event_id: &str,
    session_id: &str,
) -> ActionResult<EventReservation> {
    let event = get_event(store, event_id)?;
    let event_session = event
        .session(session_id)
        .ok_or_else(|| PortalError::SessionNotFound {
            event_id: event_id.to_string(),
            session_id: session_id.to_string(),
        })?;
    let user = session::require_user(store, "register for events")?;

    let mut reservations: Vec<EventReservation> = store::read(store, keys::EVENT_RESERVATIONS)?;
    if reservations
        .iter()
        .any(|r| r.user_id == user.id && r.session_id == event_session.id)
    {
        return Err(PortalError::AlreadyRegistered);
    }

    let reservation = EventReservation::new(models::new_id(), user.id.clone(), &event, event_session);
    reservations.push(reservation.clone());
    store::write(store, keys::EVENT_RESERVATIONS, &reservations)?;

    log::info!("user {} registered for session {}", user.id, event_session.id);
    Ok(reservation)
}

/// Session ids the current user holds a reservation for.
pub fn registered_sessions(store: &impl RecordStore) -> ActionResult<Vec<String>> {
    match session::current_user(store)? {
        Some(_) => Ok(reservations(store)?
            .into_iter()
            .map(|r| r.session_id)
            .collect()),
        None => Ok(Vec::new()),
    }
}

pub fn reservations(store: &impl RecordStore) -> ActionResult<Vec<EventReservation>> {
    let user = session::require_user(store, "view your reservations")?;
    let all: Vec<EventReservation> = store::read(store, keys::EVENT_RESERVATIONS)?;
    Ok(all.into_iter().filter(|r| r.user_id == user.id).collect())
}

/// Removes exactly one of the current user's reservations.
pub fn cancel_reservation(store: &impl RecordStore, id: &str) -> ActionResult<EventReservation> {
    let user = session::require_user(store, "cancel reservations")?;

    let mut all: Vec<EventReservation> = store::read(store, keys::EVENT_RESERVATIONS)?;
    let index = all
        .iter()
        .position(|r| r.id == id && r.user_id == user.id)
        .ok_or_else(|| PortalError::ReservationNotFound(id.to_string()))?;
    let removed = all.remove(index);

    store::write(store, keys::EVENT_RESERVATIONS, &all)?;
    log::info!("user {} cancelled reservation {}", user.id, id);
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{self, RegistrationForm};
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        seed_events(&store, today()).unwrap();
        store
    }

    fn workshop() -> NewEvent {
        NewEvent {
            title: "Rust for Researchers".to_string(),
            description: "Ownership without tears.".to_string(),
            event_type: EventType::Workshop,
            start_date: "2025-04-01".to_string(),
            end_date: "2025-04-02".to_string(),
            location: "Room 101".to_string(),
            is_virtual: false,
            max_attendees: 30,
            registration_deadline: "2025-03-30".to_string(),
            sessions: vec![
                "Borrowing|Shared and unique refs|2025-04-01T09:00|2025-04-01T11:00|Room 101|30"
                    .parse()
                    .unwrap(),
            ],
        }
    }

    #[test]
    fn test_seed_only_when_empty() {
        let store = seeded();
        assert!(!seed_events(&store, today()).unwrap());
        assert_eq!(list_events(&store, EventFilter::default()).unwrap().len(), 3);
    }

    #[test]
    fn test_organizer_events_survive_reseeding() {
        let store = seeded();
        auth::login(&store, "organizer@app.com", "password").unwrap();
        let event = add_event(&store, workshop()).unwrap();
        assert!(event.sessions.iter().all(|s| s.event_id == event.id));
        assert_eq!(event.sessions[0].start_time, "2025-04-01T09:00:00");

        seed_events(&store, today()).unwrap();
        assert_eq!(get_event(&store, &event.id).unwrap(), event);
        assert_eq!(list_events(&store, EventFilter::default()).unwrap().len(), 4);
    }

    #[test]
    fn test_filter_by_type_and_day() {
        let store = seeded();
        let workshops = list_events(
            &store,
            EventFilter {
                event_type: Some(EventType::Workshop),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(workshops.len(), 1);

        let on_today = list_events(
            &store,
            EventFilter {
                date: Some(today()),
                ..Default::default()
            },
        )
        .unwrap();
        let ids: Vec<&str> = on_today.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);

        let tomorrow = today().succ_opt().unwrap();
        let on_tomorrow = list_events(
            &store,
            EventFilter {
                date: Some(tomorrow),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(on_tomorrow.len(), 3);
    }

    #[test]
    fn test_add_event_validation() {
        let store = seeded();
        auth::login(&store, "student@app.com", "password").unwrap();
        assert!(matches!(add_event(&store, workshop()), Err(PortalError::Forbidden { .. })));

        auth::login(&store, "organizer@app.com", "password").unwrap();
        let mut backwards = workshop();
        backwards.end_date = "2025-03-01".to_string();
        assert!(matches!(
            add_event(&store, backwards),
            Err(PortalError::InvalidField { field: "End date", .. })
        ));

        let mut no_sessions = workshop();
        no_sessions.sessions.clear();
        assert!(matches!(
            add_event(&store, no_sessions),
            Err(PortalError::MissingField("Session"))
        ));

        let mut bad_time = workshop();
        bad_time.sessions[0].end_time = "noon".to_string();
        assert!(matches!(
            add_event(&store, bad_time),
            Err(PortalError::InvalidField { field: "Session end time", .. })
        ));
    }

    #[test]
    fn test_session_form_parsing() {
        assert!("too|few".parse::<SessionForm>().is_err());
        assert!("a|b|c|d|e|many".parse::<SessionForm>().is_err());
        let form: SessionForm = " Intro | Basics |2025-01-01T09:00|2025-01-01T10:00| Hall |12"
            .parse()
            .unwrap();
        assert_eq!(form.title, "Intro");
        assert_eq!(form.max_attendees, 12);
    }

    #[test]
    fn test_register_requires_login_and_valid_refs() {
        let store = seeded();
        assert!(matches!(
            register_for_session(&store, "1", "101"),
            Err(PortalError::NotLoggedIn(_))
        ));

        auth::login(&store, "student@app.com", "password").unwrap();
        assert!(matches!(
            register_for_session(&store, "9", "101"),
            Err(PortalError::EventNotFound(_))
        ));
        assert!(matches!(
            register_for_session(&store, "1", "201"),
            Err(PortalError::SessionNotFound { .. })
        ));
    }

    #[test]
    fn test_register_twice_rejected() {
        let store = seeded();
        auth::login(&store, "student@app.com", "password").unwrap();
        register_for_session(&store, "1", "101").unwrap();
        assert!(matches!(
            register_for_session(&store, "1", "101"),
            Err(PortalError::AlreadyRegistered)
        ));
        assert_eq!(registered_sessions(&store).unwrap(), vec!["101"]);
    }

    #[test]
    fn test_cancel_removes_exactly_one() {
        let store = seeded();
        auth::login(&store, "mentor@app.com", "password").unwrap();
        let theirs = register_for_session(&store, "1", "101").unwrap();

        auth::login(&store, "student@app.com", "password").unwrap();
        let keynote = register_for_session(&store, "1", "101").unwrap();
        let workshop = register_for_session(&store, "1", "102").unwrap();
        let writing = register_for_session(&store, "3", "301").unwrap();

        // someone else's reservation is invisible here
        assert!(matches!(
            cancel_reservation(&store, &theirs.id),
            Err(PortalError::ReservationNotFound(_))
        ));

        let removed = cancel_reservation(&store, &workshop.id).unwrap();
        assert_eq!(removed, workshop);

        let mine = reservations(&store).unwrap();
        assert_eq!(mine, vec![keynote, writing]);

        let all: Vec<EventReservation> = store::read(&store, keys::EVENT_RESERVATIONS).unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.contains(&theirs));
    }

    #[test]
    fn test_student_registration_scenario() {
        let store = MemoryStore::new();
        let form = RegistrationForm {
            email: "a@x.com".to_string(),
            password: "pw".to_string(),
            confirm_password: "pw".to_string(),
            first_name: "A".to_string(),
            last_name: "Student".to_string(),
            dob: "2003-01-01".to_string(),
            phone_no: "555".to_string(),
            street: "1 Main".to_string(),
            city: "Town".to_string(),
            state: "IL".to_string(),
            zipcode: "60601".to_string(),
            role: UserRole::Student,
        };
        let a = auth::register(&store, form).unwrap();
        auth::login(&store, "a@x.com", "pw").unwrap();

        seed_events(&store, today()).unwrap();
        let events = list_events(
            &store,
            EventFilter {
                date: Some(today()),
                ..Default::default()
            },
        )
        .unwrap();
        let event = &events[0];
        let session = &event.sessions[0];
        register_for_session(&store, &event.id, &session.id).unwrap();

        let all: Vec<EventReservation> = store::read(&store, keys::EVENT_RESERVATIONS).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].user_id, a.id);
        assert_eq!(all[0].session_id, session.id);

        let mine = reservations(&store).unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].session_title, session.title);
    }
}
