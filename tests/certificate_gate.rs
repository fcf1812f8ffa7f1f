use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use event_engine::domain::event::Event;
use event_engine::domain::participant::EventParticipant;
use event_engine::error::EngineError;
use event_engine::service::certificate_service::check_issue;
use std::collections::HashMap;
use uuid::Uuid;

#[test]
fn issues_for_verified_uncertified_participant() {
    let event = sample_event();
    let participant = verified_participant(&event);
    assert!(check_issue(&event, &participant, false).is_ok());
}

#[test]
fn rejects_participant_from_another_event() {
    let event = sample_event();
    let other = sample_event();
    let participant = verified_participant(&other);
    assert!(matches!(
        check_issue(&event, &participant, false),
        Err(EngineError::Validation(_))
    ));
}

#[test]
fn rejects_event_without_certificates() {
    let mut event = sample_event();
    event.has_certificate = false;
    let participant = verified_participant(&event);
    assert!(matches!(
        check_issue(&event, &participant, false),
        Err(EngineError::Ineligible(_))
    ));
}

#[test]
fn rejects_unverified_attendance() {
    let event = sample_event();
    let mut participant = verified_participant(&event);
    participant.attendance_verified_at = None;
    assert!(matches!(
        check_issue(&event, &participant, false),
        Err(EngineError::AttendanceNotVerified)
    ));
}

#[test]
fn second_issue_for_same_pair_is_rejected() {
    let event = sample_event();
    let participant = verified_participant(&event);
    assert!(check_issue(&event, &participant, false).is_ok());
    assert!(matches!(
        check_issue(&event, &participant, true),
        Err(EngineError::AlreadyIssued)
    ));
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

fn verified_participant(event: &Event) -> EventParticipant {
    EventParticipant {
        id: Uuid::new_v4(),
        event_id: event.id,
        participant_id: Uuid::new_v4(),
        registration_number: "EVT70001".to_string(),
        attendance_token: "0123456789".to_string(),
        attendance_verified_at: Some(Utc.with_ymd_and_hms(2026, 9, 10, 9, 30, 0).unwrap()),
        has_received_certificate: false,
        registered_at: Utc.with_ymd_and_hms(2026, 9, 1, 10, 0, 0).unwrap(),
    }
}
