use crate::clock::SharedClock;
use crate::domain::participant::{generate_attendance_token, EventParticipant};
use crate::error::EngineError;
use crate::repo::events_repo::EventsRepo;
use crate::repo::participants_repo::ParticipantsRepo;
use crate::windows::evaluator;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct RegistrationService {
    pub pool: PgPool,
    pub events_repo: EventsRepo,
    pub clock: SharedClock,
}

impl RegistrationService {
    /// Free registration. Ticketed events go through checkout; the
    /// participant row there is created when the payment reaches PAID.
    pub async fn register_free(
        &self,
        event_id: Uuid,
        user_id: Uuid,
    ) -> Result<EventParticipant, EngineError> {
        let event = self
            .events_repo
            .find(event_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("event {event_id}")))?;

        if event.is_paid_event {
            return Err(EngineError::Ineligible(
                "ticketed event, registration happens through checkout".to_string(),
            ));
        }

        let now = self.clock.now();
        if !evaluator::is_registration_open(&event, now) {
            return Err(EngineError::Ineligible("registration is closed".to_string()));
        }

        let token = generate_attendance_token(&mut rand::thread_rng());
        let mut tx = self.pool.begin().await.map_err(EngineError::Database)?;

        // The capacity check and the insert must see the same count, so
        // both run behind the event row lock in one transaction.
        if !EventsRepo::lock_tx(&mut tx, event.id).await? {
            return Err(EngineError::NotFound(format!("event {event_id}")));
        }
        let confirmed = ParticipantsRepo::count_for_event_tx(&mut tx, event.id).await?;
        if evaluator::has_reached_capacity(&event, confirmed) {
            tx.rollback().await.map_err(EngineError::Database)?;
            return Err(EngineError::Ineligible("event is at capacity".to_string()));
        }

        let (participant, inserted) = ParticipantsRepo::ensure_registered_tx(
            &mut tx,
            event.id,
            event.event_seq,
            user_id,
            &token,
            now,
        )
        .await?;
        tx.commit().await.map_err(EngineError::Database)?;

        if !inserted {
            return Err(EngineError::Ineligible("already registered".to_string()));
        }

        info!(
            event_id = %event.id,
            registration_number = %participant.registration_number,
            "participant registered"
        );
        Ok(participant)
    }
}
