use crate::domain::participant::{format_registration_number, EventParticipant};
use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct ParticipantsRepo {
    pub pool: PgPool,
}

impl ParticipantsRepo {
    pub async fn find(&self, event_id: Uuid, participant_id: Uuid) -> Result<Option<EventParticipant>> {
        let row = sqlx::query(
            "SELECT * FROM event_participants WHERE event_id = $1 AND participant_id = $2",
        )
        .bind(event_id)
        .bind(participant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| row_to_participant(&r)))
    }

    pub async fn count_for_event(&self, event_id: Uuid) -> Result<i64> {
        let row = sqlx::query("SELECT count(*) AS n FROM event_participants WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.get("n"))
    }

    pub async fn count_for_event_tx(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
    ) -> Result<i64> {
        let row = sqlx::query("SELECT count(*) AS n FROM event_participants WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(tx.as_mut())
            .await?;
        Ok(row.get("n"))
    }

    /// Idempotent ensure-registered upsert, shared by free registration,
    /// the webhook PAID path and manual approval. The unique constraint on
    /// (event_id, participant_id) is the guard; the existing row is
    /// returned when the pair is already registered. Numbering draws from
    /// an atomic per-event counter; the counter update also takes the
    /// event row lock, so concurrent registrations serialize and can never
    /// share a registration number.
    pub async fn ensure_registered_tx(
        tx: &mut Transaction<'_, Postgres>,
        event_id: Uuid,
        event_seq: i64,
        participant_id: Uuid,
        attendance_token: &str,
        now: DateTime<Utc>,
    ) -> Result<(EventParticipant, bool)> {
        let existing = sqlx::query(
            "SELECT * FROM event_participants WHERE event_id = $1 AND participant_id = $2",
        )
        .bind(event_id)
        .bind(participant_id)
        .fetch_optional(tx.as_mut())
        .await?;
        if let Some(row) = existing {
            return Ok((row_to_participant(&row), false));
        }

        let seq: i64 = sqlx::query(
            "UPDATE events SET registration_seq = registration_seq + 1 WHERE id = $1 RETURNING registration_seq",
        )
        .bind(event_id)
        .fetch_one(tx.as_mut())
        .await?
        .get("registration_seq");

        let registration_number = format_registration_number(event_seq, seq);

        let res = sqlx::query(
            r#"
            INSERT INTO event_participants (
                id, event_id, participant_id, registration_number,
                attendance_token, has_received_certificate, registered_at
            ) VALUES ($1, $2, $3, $4, $5, false, $6)
            ON CONFLICT (event_id, participant_id) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(participant_id)
        .bind(&registration_number)
        .bind(attendance_token)
        .bind(now)
        .execute(tx.as_mut())
        .await?;

        let inserted = res.rows_affected() == 1;
        let row = sqlx::query(
            "SELECT * FROM event_participants WHERE event_id = $1 AND participant_id = $2",
        )
        .bind(event_id)
        .bind(participant_id)
        .fetch_one(tx.as_mut())
        .await?;

        Ok((row_to_participant(&row), inserted))
    }

    /// Sets the verification timestamp at most once. Returns false when it
    /// was already set (no un-verify path exists).
    pub async fn mark_attendance_verified(
        &self,
        id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE event_participants SET attendance_verified_at = $2 WHERE id = $1 AND attendance_verified_at IS NULL",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn mark_certified_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE event_participants SET has_received_certificate = true WHERE id = $1 AND has_received_certificate = false",
        )
        .bind(id)
        .execute(tx.as_mut())
        .await?;

        Ok(res.rows_affected() == 1)
    }

    /// Participants with verified attendance and no certificate yet.
    pub async fn list_certificate_eligible(&self, event_id: Uuid) -> Result<Vec<EventParticipant>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM event_participants
            WHERE event_id = $1
              AND attendance_verified_at IS NOT NULL
              AND has_received_certificate = false
            ORDER BY registered_at ASC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(row_to_participant).collect())
    }
}

fn row_to_participant(r: &PgRow) -> EventParticipant {
    EventParticipant {
        id: r.get("id"),
        event_id: r.get("event_id"),
        participant_id: r.get("participant_id"),
        registration_number: r.get("registration_number"),
        attendance_token: r.get("attendance_token"),
        attendance_verified_at: r.get("attendance_verified_at"),
        has_received_certificate: r.get("has_received_certificate"),
        registered_at: r.get("registered_at"),
    }
}
