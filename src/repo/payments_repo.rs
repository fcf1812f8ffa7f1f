use crate::domain::payment::{Payment, PaymentMethod, PaymentStatus, TicketSelection};
use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

pub struct NewPayment {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub external_id: String,
    pub gateway_payment_id: Option<String>,
    pub amount_minor: i64,
    pub price_per_ticket_minor: i64,
    pub ticket_number: String,
    pub is_early_bird: bool,
    pub requires_approval: bool,
    pub expires_at: DateTime<Utc>,
    pub selection: TicketSelection,
}

#[derive(Clone)]
pub struct PaymentsRepo {
    pub pool: PgPool,
}

impl PaymentsRepo {
    pub async fn insert(&self, p: &NewPayment) -> Result<Payment> {
        let row = sqlx::query(
            r#"
            INSERT INTO payments (
                id, event_id, user_id, external_id, gateway_payment_id,
                amount_minor, currency, status, payment_method, payment_channel,
                ticket_type, quantity, price_per_ticket_minor, ticket_number,
                is_early_bird, discount_amount_minor, discount_code,
                attendee_info, requires_approval, expires_at
            ) VALUES (
                $1, $2, $3, $4, $5,
                $6, $7, 'PENDING', $8, $9,
                $10, $11, $12, $13,
                $14, $15, $16,
                $17, $18, $19
            )
            RETURNING *
            "#,
        )
        .bind(p.id)
        .bind(p.event_id)
        .bind(p.user_id)
        .bind(&p.external_id)
        .bind(&p.gateway_payment_id)
        .bind(p.amount_minor)
        .bind(&p.selection.currency)
        .bind(p.selection.payment_method.as_str())
        .bind(&p.selection.payment_channel)
        .bind(&p.selection.ticket_type)
        .bind(p.selection.quantity)
        .bind(p.price_per_ticket_minor)
        .bind(&p.ticket_number)
        .bind(p.is_early_bird)
        .bind(p.selection.discount_amount_minor)
        .bind(&p.selection.discount_code)
        .bind(&p.selection.attendee_info)
        .bind(p.requires_approval)
        .bind(p.expires_at)
        .fetch_one(&self.pool)
        .await?;

        row_to_payment(&row)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Payment>> {
        let row = sqlx::query("SELECT * FROM payments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_payment(&r)).transpose()
    }

    pub async fn find_by_external_id(&self, external_id: &str) -> Result<Option<Payment>> {
        let row = sqlx::query("SELECT * FROM payments WHERE external_id = $1")
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| row_to_payment(&r)).transpose()
    }

    pub async fn find_by_gateway_id_tx(
        tx: &mut Transaction<'_, Postgres>,
        gateway_payment_id: &str,
    ) -> Result<Option<Payment>> {
        let row = sqlx::query("SELECT * FROM payments WHERE gateway_payment_id = $1 FOR UPDATE")
            .bind(gateway_payment_id)
            .fetch_optional(tx.as_mut())
            .await?;
        row.map(|r| row_to_payment(&r)).transpose()
    }

    pub async fn sum_paid_quantity(&self, event_id: Uuid, user_id: Uuid) -> Result<i64> {
        let row = sqlx::query(
            r#"
            SELECT coalesce(sum(quantity), 0)::BIGINT AS total
            FROM payments
            WHERE event_id = $1 AND user_id = $2 AND status = 'PAID'
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(row.get("total"))
    }

    /// Conditional terminal-status update; the `status = 'PENDING'` guard is
    /// what makes concurrent/duplicate webhook delivery safe. Returns false
    /// when the payment was no longer pending.
    pub async fn apply_terminal_status_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        status: PaymentStatus,
        paid_at: Option<DateTime<Utc>>,
        raw_payload: &serde_json::Value,
    ) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE payments
            SET status = $2, paid_at = $3, gateway_payload = $4, updated_at = now()
            WHERE id = $1 AND status = 'PENDING'
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .bind(paid_at)
        .bind(raw_payload)
        .execute(tx.as_mut())
        .await?;

        Ok(res.rows_affected() == 1)
    }

    /// Single-approval guard: only a paid, approval-gated, not-yet-approved
    /// payment can be approved. Returns false otherwise.
    pub async fn approve_tx(
        tx: &mut Transaction<'_, Postgres>,
        id: Uuid,
        approver: Uuid,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let res = sqlx::query(
            r#"
            UPDATE payments
            SET approved_at = $3, approved_by = $2, updated_at = now()
            WHERE id = $1
              AND requires_approval = true
              AND approved_at IS NULL
              AND status = 'PAID'
            "#,
        )
        .bind(id)
        .bind(approver)
        .bind(now)
        .execute(tx.as_mut())
        .await?;

        Ok(res.rows_affected() == 1)
    }
}

fn row_to_payment(r: &PgRow) -> Result<Payment> {
    let status: String = r.get("status");
    let method: String = r.get("payment_method");

    Ok(Payment {
        id: r.get("id"),
        event_id: r.get("event_id"),
        user_id: r.get("user_id"),
        external_id: r.get("external_id"),
        gateway_payment_id: r.get("gateway_payment_id"),
        amount_minor: r.get("amount_minor"),
        currency: r.get("currency"),
        status: PaymentStatus::parse(&status)
            .ok_or_else(|| anyhow!("unknown payment status in store: {status}"))?,
        payment_method: PaymentMethod::parse(&method)
            .ok_or_else(|| anyhow!("unknown payment method in store: {method}"))?,
        payment_channel: r.get("payment_channel"),
        ticket_type: r.get("ticket_type"),
        quantity: r.get("quantity"),
        price_per_ticket_minor: r.get("price_per_ticket_minor"),
        ticket_number: r.get("ticket_number"),
        is_early_bird: r.get("is_early_bird"),
        discount_amount_minor: r.get("discount_amount_minor"),
        discount_code: r.get("discount_code"),
        attendee_info: r.get("attendee_info"),
        requires_approval: r.get("requires_approval"),
        approved_at: r.get("approved_at"),
        approved_by: r.get("approved_by"),
        expires_at: r.get("expires_at"),
        paid_at: r.get("paid_at"),
    })
}
