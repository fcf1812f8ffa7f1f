use crate::clock::SharedClock;
use crate::domain::participant::EventParticipant;
use crate::error::EngineError;
use crate::repo::events_repo::EventsRepo;
use crate::repo::participants_repo::ParticipantsRepo;
use crate::windows::evaluator;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct AttendanceService {
    pub events_repo: EventsRepo,
    pub participants_repo: ParticipantsRepo,
    pub clock: SharedClock,
}

impl AttendanceService {
    /// Marks attendance for a registered participant presenting their
    /// token. The timestamp is set at most once; re-verifying an already
    /// verified participant is a no-op success.
    pub async fn verify(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        token: &str,
    ) -> Result<EventParticipant, EngineError> {
        let event = self
            .events_repo
            .find(event_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("event {event_id}")))?;

        let participant = self
            .participants_repo
            .find(event.id, user_id)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(format!("no registration for user {user_id}"))
            })?;

        let now = self.clock.now();
        if !evaluator::is_attendance_open(&event, now) {
            return Err(EngineError::Ineligible(
                "attendance is only open on the event day, after the start time".to_string(),
            ));
        }

        if participant.attendance_token != token {
            return Err(EngineError::Validation("invalid attendance token".to_string()));
        }

        if participant.is_attendance_verified() {
            return Ok(participant);
        }

        self.participants_repo
            .mark_attendance_verified(participant.id, now)
            .await?;
        info!(
            event_id = %event.id,
            registration_number = %participant.registration_number,
            "attendance verified"
        );

        self.participants_repo
            .find(event.id, user_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("no registration for user {user_id}")))
    }
}
