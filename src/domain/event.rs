use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Single derived lifecycle phase, replacing the overlapping
/// registration-open / past-event boolean pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventPhase {
    /// Reserved for a future explicit registration-opens timestamp;
    /// with the current fields registration is open from creation.
    NotOpenYet,
    Open,
    Closed,
    Past,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketTypeConfig {
    pub price_minor: i64,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct Event {
    pub id: Uuid,
    /// Small sequential code used in registration and ticket numbers.
    pub event_seq: i64,
    pub title: String,
    pub description: String,
    pub location: String,
    /// Civil date/time fields, interpreted in the service timezone (UTC).
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub registration_deadline: DateTime<Utc>,
    pub is_paid_event: bool,
    pub ticket_price_minor: i64,
    pub ticket_types: HashMap<String, TicketTypeConfig>,
    pub early_bird_enabled: bool,
    pub early_bird_discount_percent: i32,
    pub early_bird_deadline: Option<DateTime<Utc>>,
    pub max_tickets_per_user: i32,
    pub requires_approval: bool,
    pub max_participants: Option<i32>,
    pub has_certificate: bool,
    pub certificate_required: bool,
}

impl Event {
    pub fn start_datetime(&self) -> DateTime<Utc> {
        self.date.and_time(self.start_time).and_utc()
    }

    pub fn end_datetime(&self) -> DateTime<Utc> {
        self.date.and_time(self.end_time).and_utc()
    }

    /// Unit price for a ticket type name, falling back to the flat event
    /// price when no type is given or none are configured.
    pub fn base_price_minor(&self, ticket_type: Option<&str>) -> Option<i64> {
        match ticket_type {
            Some(name) => self.ticket_types.get(name).map(|t| t.price_minor),
            None if self.ticket_types.is_empty() => Some(self.ticket_price_minor),
            None => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub registration_deadline: DateTime<Utc>,
    #[serde(default)]
    pub is_paid_event: bool,
    #[serde(default)]
    pub ticket_price_minor: i64,
    #[serde(default)]
    pub ticket_types: HashMap<String, TicketTypeConfig>,
    #[serde(default)]
    pub early_bird_enabled: bool,
    #[serde(default)]
    pub early_bird_discount_percent: i32,
    #[serde(default)]
    pub early_bird_deadline: Option<DateTime<Utc>>,
    #[serde(default = "default_max_tickets")]
    pub max_tickets_per_user: i32,
    #[serde(default)]
    pub requires_approval: bool,
    #[serde(default)]
    pub max_participants: Option<i32>,
    #[serde(default)]
    pub has_certificate: bool,
    #[serde(default)]
    pub certificate_required: bool,
}

fn default_max_tickets() -> i32 {
    1
}

#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub registration_deadline: DateTime<Utc>,
    pub is_paid_event: bool,
    pub phase: EventPhase,
    pub early_bird_active: bool,
    pub attendance_open: bool,
    pub confirmed_participants: i64,
    pub max_participants: Option<i32>,
}
