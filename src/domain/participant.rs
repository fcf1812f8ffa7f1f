use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct EventParticipant {
    pub id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub registration_number: String,
    #[serde(skip_serializing)]
    pub attendance_token: String,
    pub attendance_verified_at: Option<DateTime<Utc>>,
    pub has_received_certificate: bool,
    pub registered_at: DateTime<Utc>,
}

impl EventParticipant {
    pub fn is_attendance_verified(&self) -> bool {
        self.attendance_verified_at.is_some()
    }
}

/// Event-scoped sequential registration number: `EVT<event_seq><NNNN>`,
/// sequence zero-padded to 4 digits (1st participant of event 7 -> EVT70001).
pub fn format_registration_number(event_seq: i64, seq: i64) -> String {
    format!("EVT{}{:04}", event_seq, seq)
}

/// Ticket number assigned in one step at payment creation:
/// `TKT<event_seq><random 6 digits>`.
pub fn format_ticket_number(event_seq: i64, suffix: u32) -> String {
    format!("TKT{}{:06}", event_seq, suffix % 1_000_000)
}

/// 10-digit numeric attendance secret, issued once at registration and
/// never reissued. Leading zeros are valid.
pub fn generate_attendance_token<R: Rng>(rng: &mut R) -> String {
    (0..10).map(|_| char::from(b'0' + rng.gen_range(0..10u8))).collect()
}
