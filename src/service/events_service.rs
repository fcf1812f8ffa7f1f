use crate::clock::SharedClock;
use crate::domain::event::{CreateEventRequest, Event, EventView};
use crate::error::EngineError;
use crate::repo::events_repo::EventsRepo;
use crate::repo::participants_repo::ParticipantsRepo;
use crate::windows::evaluator;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct EventsService {
    pub events_repo: EventsRepo,
    pub participants_repo: ParticipantsRepo,
    pub clock: SharedClock,
}

impl EventsService {
    pub async fn create(&self, req: CreateEventRequest) -> Result<Event, EngineError> {
        let now = self.clock.now();
        validate_create(&req)?;

        if !evaluator::can_admin_create(req.date, now) {
            return Err(EngineError::Ineligible(format!(
                "events must be created at least {} days ahead",
                evaluator::MIN_CREATION_LEAD_DAYS
            )));
        }

        let event = self.events_repo.insert(Uuid::new_v4(), &req).await?;
        info!(event_id = %event.id, title = %event.title, "event created");
        Ok(event)
    }

    pub async fn get_view(&self, id: Uuid) -> Result<EventView, EngineError> {
        let event = self.get(id).await?;
        let confirmed = self.participants_repo.count_for_event(id).await?;
        let now = self.clock.now();

        Ok(EventView {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            location: event.location.clone(),
            date: event.date,
            start_time: event.start_time,
            end_time: event.end_time,
            registration_deadline: event.registration_deadline,
            is_paid_event: event.is_paid_event,
            phase: evaluator::event_phase(&event, now),
            early_bird_active: evaluator::is_early_bird_active(&event, now),
            attendance_open: evaluator::is_attendance_open(&event, now),
            confirmed_participants: confirmed,
            max_participants: event.max_participants,
        })
    }

    pub async fn get(&self, id: Uuid) -> Result<Event, EngineError> {
        self.events_repo
            .find(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("event {id}")))
    }

    /// Soft delete, blocked entirely while participants exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), EngineError> {
        let event = self.get(id).await?;
        let participants = self.participants_repo.count_for_event(event.id).await?;
        if participants > 0 {
            return Err(EngineError::Conflict(
                "event has participants and cannot be deleted".to_string(),
            ));
        }

        self.events_repo.soft_delete(id, self.clock.now()).await?;
        info!(event_id = %id, "event soft-deleted");
        Ok(())
    }
}

fn validate_create(req: &CreateEventRequest) -> Result<(), EngineError> {
    if req.title.trim().is_empty() {
        return Err(EngineError::Validation("title must not be empty".to_string()));
    }
    if req.end_time <= req.start_time {
        return Err(EngineError::Validation("end_time must be after start_time".to_string()));
    }
    if req.registration_deadline.date_naive() > req.date {
        return Err(EngineError::Validation(
            "registration_deadline must not be after the event date".to_string(),
        ));
    }
    if req.is_paid_event && req.ticket_price_minor < 0 {
        return Err(EngineError::Validation("ticket_price must not be negative".to_string()));
    }
    if req.early_bird_enabled {
        if req.early_bird_deadline.is_none() {
            return Err(EngineError::Validation(
                "early_bird_deadline is required when early bird is enabled".to_string(),
            ));
        }
        if !(0..=100).contains(&req.early_bird_discount_percent) {
            return Err(EngineError::Validation(
                "early_bird_discount_percent must be between 0 and 100".to_string(),
            ));
        }
    }
    if req.max_tickets_per_user < 1 {
        return Err(EngineError::Validation(
            "max_tickets_per_user must be at least 1".to_string(),
        ));
    }
    if let Some(max) = req.max_participants {
        if max < 1 {
            return Err(EngineError::Validation(
                "max_participants must be at least 1 when set".to_string(),
            ));
        }
    }
    Ok(())
}
