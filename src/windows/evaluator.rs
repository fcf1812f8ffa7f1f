use crate::domain::event::{Event, EventPhase};
use chrono::{DateTime, Utc};

/// Organizers must create events at least this many whole days ahead.
/// Checked at creation only, never re-checked at update.
pub const MIN_CREATION_LEAD_DAYS: i64 = 3;

/// Derives the single lifecycle phase from the event's configured
/// timestamps. Pure and total; callers fetch a fresh event before
/// evaluating, nothing is cached.
pub fn event_phase(event: &Event, now: DateTime<Utc>) -> EventPhase {
    if now > event.end_datetime() {
        return EventPhase::Past;
    }
    if now < event.start_datetime() && now <= event.registration_deadline {
        return EventPhase::Open;
    }
    EventPhase::Closed
}

pub fn is_registration_open(event: &Event, now: DateTime<Utc>) -> bool {
    event_phase(event, now) == EventPhase::Open
}

pub fn is_past_event(event: &Event, now: DateTime<Utc>) -> bool {
    event_phase(event, now) == EventPhase::Past
}

/// Attendance opens at the start time and stays open for the rest of the
/// event's calendar day. It does not close at end_time; day rollover is
/// the only closing condition.
pub fn is_attendance_open(event: &Event, now: DateTime<Utc>) -> bool {
    now.date_naive() == event.date && now >= event.start_datetime()
}

pub fn is_early_bird_active(event: &Event, now: DateTime<Utc>) -> bool {
    event.early_bird_enabled
        && event.early_bird_deadline.map(|d| now <= d).unwrap_or(false)
}

pub fn can_admin_create(event_date: chrono::NaiveDate, now: DateTime<Utc>) -> bool {
    (event_date - now.date_naive()).num_days() >= MIN_CREATION_LEAD_DAYS
}

pub fn has_reached_capacity(event: &Event, confirmed_count: i64) -> bool {
    event
        .max_participants
        .map(|max| confirmed_count >= max as i64)
        .unwrap_or(false)
}

pub fn can_user_register(
    event: &Event,
    already_registered: bool,
    confirmed_count: i64,
    now: DateTime<Utc>,
) -> bool {
    !already_registered
        && is_registration_open(event, now)
        && !has_reached_capacity(event, confirmed_count)
}

pub fn can_user_buy_tickets(event: &Event, prior_paid_quantity: i64, quantity: i32) -> bool {
    quantity >= 1 && prior_paid_quantity + quantity as i64 <= event.max_tickets_per_user as i64
}
