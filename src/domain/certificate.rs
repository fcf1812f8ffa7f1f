use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    pub id: Uuid,
    pub event_id: Uuid,
    pub participant_id: Uuid,
    pub certificate_number: Uuid,
    pub certificate_path: String,
    pub issued_at: DateTime<Utc>,
    pub download_count: i32,
    pub verified_at: Option<DateTime<Utc>>,
    pub verification_notes: Option<String>,
}

/// Outcome of a best-effort batch issuance. Per-participant failures are
/// collected instead of aborting the batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchIssueReport {
    pub issued: u32,
    pub errors: Vec<BatchIssueError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchIssueError {
    pub participant_id: Uuid,
    pub message: String,
}
