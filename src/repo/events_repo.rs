use crate::domain::event::{CreateEventRequest, Event};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct EventsRepo {
    pub pool: PgPool,
}

impl EventsRepo {
    pub async fn insert(&self, id: Uuid, req: &CreateEventRequest) -> Result<Event> {
        let row = sqlx::query(
            r#"
            INSERT INTO events (
                id, title, description, location, event_date, start_time, end_time,
                registration_deadline, is_paid_event, ticket_price_minor, ticket_types,
                early_bird_enabled, early_bird_discount_percent, early_bird_deadline,
                max_tickets_per_user, requires_approval, max_participants,
                has_certificate, certificate_required
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7,
                $8, $9, $10, $11,
                $12, $13, $14,
                $15, $16, $17,
                $18, $19
            )
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&req.title)
        .bind(&req.description)
        .bind(&req.location)
        .bind(req.date)
        .bind(req.start_time)
        .bind(req.end_time)
        .bind(req.registration_deadline)
        .bind(req.is_paid_event)
        .bind(req.ticket_price_minor)
        .bind(serde_json::to_value(&req.ticket_types)?)
        .bind(req.early_bird_enabled)
        .bind(req.early_bird_discount_percent)
        .bind(req.early_bird_deadline)
        .bind(req.max_tickets_per_user)
        .bind(req.requires_approval)
        .bind(req.max_participants)
        .bind(req.has_certificate)
        .bind(req.certificate_required)
        .fetch_one(&self.pool)
        .await?;

        row_to_event(&row)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query("SELECT * FROM events WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_event(&r)).transpose()
    }

    /// Lookup that keeps soft-deleted events visible. Gateway callbacks
    /// must still resolve payments for an event deleted after checkout.
    pub async fn find_including_deleted(&self, id: Uuid) -> Result<Option<Event>> {
        let row = sqlx::query("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| row_to_event(&r)).transpose()
    }

    /// Takes the event row lock inside the caller's transaction so
    /// capacity checks and registration writes serialize per event.
    /// Returns false when the event does not exist.
    pub async fn lock_tx(tx: &mut Transaction<'_, Postgres>, id: Uuid) -> Result<bool> {
        let row = sqlx::query("SELECT id FROM events WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(tx.as_mut())
            .await?;
        Ok(row.is_some())
    }

    /// Soft delete: the row is retained and hidden from active queries.
    pub async fn soft_delete(&self, id: Uuid, now: DateTime<Utc>) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE events SET deleted_at = $2, updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }
}

fn row_to_event(r: &PgRow) -> Result<Event> {
    Ok(Event {
        id: r.get("id"),
        event_seq: r.get("event_seq"),
        title: r.get("title"),
        description: r.get("description"),
        location: r.get("location"),
        date: r.get("event_date"),
        start_time: r.get("start_time"),
        end_time: r.get("end_time"),
        registration_deadline: r.get("registration_deadline"),
        is_paid_event: r.get("is_paid_event"),
        ticket_price_minor: r.get("ticket_price_minor"),
        ticket_types: serde_json::from_value(r.get::<serde_json::Value, _>("ticket_types"))?,
        early_bird_enabled: r.get("early_bird_enabled"),
        early_bird_discount_percent: r.get("early_bird_discount_percent"),
        early_bird_deadline: r.get("early_bird_deadline"),
        max_tickets_per_user: r.get("max_tickets_per_user"),
        requires_approval: r.get("requires_approval"),
        max_participants: r.get("max_participants"),
        has_certificate: r.get("has_certificate"),
        certificate_required: r.get("certificate_required"),
    })
}
