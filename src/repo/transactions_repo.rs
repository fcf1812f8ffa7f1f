use anyhow::Result;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

/// Append-only mirror of completed ticket payments, written in the same
/// transaction as the PAID status change.
pub struct TransactionsRepo;

impl TransactionsRepo {
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        payment_id: Uuid,
        amount_minor: i64,
    ) -> Result<()> {
        sqlx::query(
            "INSERT INTO ticket_transactions (payment_id, amount_minor) VALUES ($1, $2)",
        )
        .bind(payment_id)
        .bind(amount_minor)
        .execute(tx.as_mut())
        .await?;
        Ok(())
    }
}
