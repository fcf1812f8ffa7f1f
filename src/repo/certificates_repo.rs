use crate::domain::certificate::Certificate;
use anyhow::Result;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, Row, Transaction};
use uuid::Uuid;

#[derive(Clone)]
pub struct CertificatesRepo {
    pub pool: PgPool,
}

impl CertificatesRepo {
    pub async fn exists(&self, event_id: Uuid, participant_id: Uuid) -> Result<bool> {
        let row = sqlx::query(
            "SELECT count(*) AS n FROM certificates WHERE event_id = $1 AND participant_id = $2",
        )
        .bind(event_id)
        .bind(participant_id)
        .fetch_one(&self.pool)
        .await?;
        let n: i64 = row.get("n");
        Ok(n > 0)
    }

    /// Inserts the certificate row. The unique (event_id, participant_id)
    /// constraint backs the at-most-one invariant; a conflicting insert
    /// reports false instead of a second row.
    pub async fn insert_tx(
        tx: &mut Transaction<'_, Postgres>,
        cert: &Certificate,
    ) -> Result<bool> {
        let res = sqlx::query(
            r#"
            INSERT INTO certificates (
                id, event_id, participant_id, certificate_number,
                certificate_path, issued_at, download_count
            ) VALUES ($1, $2, $3, $4, $5, $6, 0)
            ON CONFLICT (event_id, participant_id) DO NOTHING
            "#,
        )
        .bind(cert.id)
        .bind(cert.event_id)
        .bind(cert.participant_id)
        .bind(cert.certificate_number)
        .bind(&cert.certificate_path)
        .bind(cert.issued_at)
        .execute(tx.as_mut())
        .await?;

        Ok(res.rows_affected() == 1)
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Certificate>> {
        let row = sqlx::query("SELECT * FROM certificates WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| row_to_certificate(&r)))
    }

    pub async fn increment_download(&self, id: Uuid) -> Result<bool> {
        let res = sqlx::query(
            "UPDATE certificates SET download_count = download_count + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(res.rows_affected() == 1)
    }
}

fn row_to_certificate(r: &PgRow) -> Certificate {
    Certificate {
        id: r.get("id"),
        event_id: r.get("event_id"),
        participant_id: r.get("participant_id"),
        certificate_number: r.get("certificate_number"),
        certificate_path: r.get("certificate_path"),
        issued_at: r.get("issued_at"),
        download_count: r.get("download_count"),
        verified_at: r.get("verified_at"),
        verification_notes: r.get("verification_notes"),
    }
}
