use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use event_engine::domain::event::{Event, EventPhase};
use event_engine::windows::evaluator::{
    can_admin_create, can_user_buy_tickets, can_user_register, event_phase, has_reached_capacity,
    is_attendance_open, is_early_bird_active, is_past_event, is_registration_open,
};
use std::collections::HashMap;
use uuid::Uuid;

#[test]
fn registration_open_before_deadline_and_start() {
    let event = sample_event();
    assert_eq!(event_phase(&event, at(2026, 9, 5, 12, 0)), EventPhase::Open);
    assert!(is_registration_open(&event, at(2026, 9, 5, 12, 0)));
}

#[test]
fn registration_closed_after_deadline() {
    let event = sample_event();
    assert_eq!(event_phase(&event, at(2026, 9, 8, 0, 1)), EventPhase::Closed);
    assert!(!is_registration_open(&event, at(2026, 9, 8, 0, 1)));
}

#[test]
fn registration_closed_at_event_start() {
    let mut event = sample_event();
    // deadline after start so the start boundary is what closes it
    event.registration_deadline = at(2026, 9, 10, 12, 0);
    assert!(!is_registration_open(&event, at(2026, 9, 10, 9, 0)));
}

#[test]
fn registration_open_exactly_at_deadline() {
    let event = sample_event();
    assert!(is_registration_open(&event, at(2026, 9, 8, 0, 0)));
}

#[test]
fn past_only_after_end_datetime() {
    let event = sample_event();
    assert!(!is_past_event(&event, at(2026, 9, 10, 17, 0)));
    assert!(is_past_event(&event, at(2026, 9, 10, 17, 1)));
    assert_eq!(event_phase(&event, at(2026, 9, 11, 0, 0)), EventPhase::Past);
}

#[test]
fn event_day_is_closed_not_past_before_end() {
    let event = sample_event();
    assert_eq!(event_phase(&event, at(2026, 9, 10, 12, 0)), EventPhase::Closed);
}

#[test]
fn attendance_closed_before_start() {
    let event = sample_event();
    assert!(!is_attendance_open(&event, at(2026, 9, 10, 8, 59)));
}

#[test]
fn attendance_open_from_start_until_day_rollover() {
    let event = sample_event();
    assert!(is_attendance_open(&event, at(2026, 9, 10, 9, 0)));
    // stays open past end_time on the same day
    assert!(is_attendance_open(&event, at(2026, 9, 10, 23, 59)));
    assert!(!is_attendance_open(&event, at(2026, 9, 11, 9, 0)));
}

#[test]
fn attendance_closed_on_other_days() {
    let event = sample_event();
    assert!(!is_attendance_open(&event, at(2026, 9, 9, 12, 0)));
}

#[test]
fn early_bird_requires_enabled_flag_and_deadline() {
    let mut event = sample_event();
    assert!(!is_early_bird_active(&event, at(2026, 9, 1, 0, 0)));

    event.early_bird_enabled = true;
    assert!(!is_early_bird_active(&event, at(2026, 9, 1, 0, 0)));

    event.early_bird_deadline = Some(at(2026, 9, 3, 0, 0));
    assert!(is_early_bird_active(&event, at(2026, 9, 2, 12, 0)));
    assert!(is_early_bird_active(&event, at(2026, 9, 3, 0, 0)));
    assert!(!is_early_bird_active(&event, at(2026, 9, 3, 0, 1)));
}

#[test]
fn creation_lead_time_is_three_whole_days() {
    let date = NaiveDate::from_ymd_opt(2026, 9, 10).unwrap();
    assert!(can_admin_create(date, at(2026, 9, 7, 23, 0)));
    assert!(!can_admin_create(date, at(2026, 9, 8, 0, 0)));
}

#[test]
fn capacity_of_one_blocks_second_user() {
    let mut event = sample_event();
    event.max_participants = Some(1);

    assert!(has_reached_capacity(&event, 1));
    assert!(!can_user_register(&event, false, 1, at(2026, 9, 5, 12, 0)));
}

#[test]
fn unlimited_capacity_never_fills() {
    let event = sample_event();
    assert!(!has_reached_capacity(&event, 1_000_000));
}

#[test]
fn already_registered_user_cannot_register_again() {
    let event = sample_event();
    assert!(!can_user_register(&event, true, 0, at(2026, 9, 5, 12, 0)));
    assert!(can_user_register(&event, false, 0, at(2026, 9, 5, 12, 0)));
}

#[test]
fn ticket_limit_counts_prior_paid_quantity() {
    let mut event = sample_event();
    event.max_tickets_per_user = 2;

    assert!(can_user_buy_tickets(&event, 1, 1));
    assert!(!can_user_buy_tickets(&event, 1, 2));
    assert!(!can_user_buy_tickets(&event, 0, 0));
}

fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
}

fn sample_event() -> Event {
    Event {
        id: Uuid::new_v4(),
        event_seq: 7,
        title: "Rust Meetup".to_string(),
        description: String::new(),
        location: "Jakarta".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
        start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        end_time: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
        registration_deadline: Utc.with_ymd_and_hms(2026, 9, 8, 0, 0, 0).unwrap(),
        is_paid_event: false,
        ticket_price_minor: 0,
        ticket_types: HashMap::new(),
        early_bird_enabled: false,
        early_bird_discount_percent: 0,
        early_bird_deadline: None,
        max_tickets_per_user: 1,
        requires_approval: false,
        max_participants: None,
        has_certificate: true,
        certificate_required: false,
    }
}
