use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CalendarEvent {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_type: String,
    pub starts_at: NaiveDateTime,
    pub ends_at: Option<NaiveDateTime>,
    pub all_day: bool,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Event vocabulary stored in `event_type`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Appointment,
    Vaccination,
    Milestone,
    Activity,
    Reminder,
    #[default]
    Other,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Appointment => "appointment",
            EventType::Vaccination => "vaccination",
            EventType::Milestone => "milestone",
            EventType::Activity => "activity",
            EventType::Reminder => "reminder",
            EventType::Other => "other",
        }
    }
}

/// POST /calendar/events
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description must be under 5000 characters"))]
    pub description: Option<String>,

    /// Default: "other"
    #[serde(default)]
    pub event_type: EventType,

    pub starts_at: NaiveDateTime,
    pub ends_at: Option<NaiveDateTime>,

    #[serde(default)]
    pub all_day: bool,

    #[validate(length(max = 255, message = "Location too long"))]
    pub location: Option<String>,
}

/// PUT /calendar/events/:id, partial update
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description must be under 5000 characters"))]
    pub description: Option<String>,

    pub event_type: Option<EventType>,
    pub starts_at: Option<NaiveDateTime>,
    pub ends_at: Option<NaiveDateTime>,
    pub all_day: Option<bool>,

    #[validate(length(max = 255, message = "Location too long"))]
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    #[serde(rename = "type")]
    pub event_type: Option<EventType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub q: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct EventTypeCount {
    pub event_type: String,
    pub total: i64,
}

/// `ends_at`, when present, may not precede `starts_at`.
pub fn check_event_span(
    starts_at: NaiveDateTime,
    ends_at: Option<NaiveDateTime>,
) -> Result<(), String> {
    match ends_at {
        Some(end) if end < starts_at => Err("ends_at must not be before starts_at".into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_event_span() {
        assert!(check_event_span(at(9), None).is_ok());
        assert!(check_event_span(at(9), Some(at(9))).is_ok());
        assert!(check_event_span(at(9), Some(at(10))).is_ok());
        assert!(check_event_span(at(10), Some(at(9))).is_err());
    }

    #[test]
    fn test_create_request_defaults_to_other() {
        let req: CreateEventRequest = serde_json::from_str(
            r#"{ "title": "Pediatra", "starts_at": "2026-03-02T09:30:00" }"#,
        )
        .unwrap();
        assert_eq!(req.event_type, EventType::Other);
        assert!(!req.all_day);
    }

    #[test]
    fn test_unknown_event_type_is_rejected() {
        let res = serde_json::from_str::<CreateEventRequest>(
            r#"{ "title": "x", "event_type": "cita", "starts_at": "2026-03-02T09:30:00" }"#,
        );
        assert!(res.is_err());
    }
}
