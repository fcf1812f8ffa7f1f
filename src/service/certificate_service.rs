use crate::clock::SharedClock;
use crate::domain::certificate::{BatchIssueError, BatchIssueReport, Certificate};
use crate::domain::event::Event;
use crate::domain::participant::EventParticipant;
use crate::error::EngineError;
use crate::repo::certificates_repo::CertificatesRepo;
use crate::repo::events_repo::EventsRepo;
use crate::repo::participants_repo::ParticipantsRepo;
use crate::storage::{ArtifactStore, CertificateRenderer};
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Precondition chain for issuing a certificate, checked in order:
/// participant belongs to the event, the event issues certificates at all,
/// attendance has been verified, and none was issued before.
pub fn check_issue(
    event: &Event,
    participant: &EventParticipant,
    already_issued: bool,
) -> Result<(), EngineError> {
    if participant.event_id != event.id {
        return Err(EngineError::Validation(
            "participant does not belong to this event".to_string(),
        ));
    }
    if !event.has_certificate {
        return Err(EngineError::Ineligible(
            "event does not issue certificates".to_string(),
        ));
    }
    if !participant.is_attendance_verified() {
        return Err(EngineError::AttendanceNotVerified);
    }
    if already_issued {
        return Err(EngineError::AlreadyIssued);
    }
    Ok(())
}

#[derive(Clone)]
pub struct CertificateService {
    pub pool: PgPool,
    pub events_repo: EventsRepo,
    pub participants_repo: ParticipantsRepo,
    pub certificates_repo: CertificatesRepo,
    pub store: Arc<dyn ArtifactStore>,
    pub renderer: Arc<dyn CertificateRenderer>,
    pub clock: SharedClock,
}

impl CertificateService {
    pub async fn issue(&self, event_id: Uuid, user_id: Uuid) -> Result<Certificate, EngineError> {
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

        self.issue_for_participant(&event, &participant).await
    }

    /// Best-effort batch over every verified, not-yet-certified
    /// participant. Per-item failures are collected, not propagated, so one
    /// bad participant cannot abort the rest.
    pub async fn issue_all_eligible(&self, event_id: Uuid) -> Result<BatchIssueReport, EngineError> {
        let event = self
            .events_repo
            .find(event_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("event {event_id}")))?;

        let eligible = self.participants_repo.list_certificate_eligible(event.id).await?;

        let mut report = BatchIssueReport {
            issued: 0,
            errors: Vec::new(),
        };
        for participant in eligible {
            match self.issue_for_participant(&event, &participant).await {
                Ok(_) => report.issued += 1,
                Err(e) => {
                    warn!(
                        event_id = %event.id,
                        participant_id = %participant.participant_id,
                        error = %e,
                        "certificate issuance failed for participant"
                    );
                    report.errors.push(BatchIssueError {
                        participant_id: participant.participant_id,
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    pub async fn record_download(&self, certificate_id: Uuid) -> Result<Certificate, EngineError> {
        if !self.certificates_repo.increment_download(certificate_id).await? {
            return Err(EngineError::NotFound(format!("certificate {certificate_id}")));
        }
        self.certificates_repo
            .find(certificate_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("certificate {certificate_id}")))
    }

    /// Renders and stores the artifact first, then commits the certificate
    /// row and the participant flag as one transaction. A transaction
    /// failure deletes the stored artifact so no path exists where the flag
    /// is set without a row or a row without an artifact.
    async fn issue_for_participant(
        &self,
        event: &Event,
        participant: &EventParticipant,
    ) -> Result<Certificate, EngineError> {
        let already_issued = self
            .certificates_repo
            .exists(event.id, participant.participant_id)
            .await?;
        check_issue(event, participant, already_issued)?;

        let bytes = self
            .renderer
            .render(event, participant)
            .map_err(|e| EngineError::ExternalDependency(format!("certificate render: {e}")))?;

        let certificate_number = Uuid::new_v4();
        let path = format!("certificates/{}/{}.pdf", event.id, participant.participant_id);
        self.store
            .store(&path, bytes)
            .await
            .map_err(|e| EngineError::ExternalDependency(format!("artifact store: {e}")))?;

        let cert = Certificate {
            id: Uuid::new_v4(),
            event_id: event.id,
            participant_id: participant.participant_id,
            certificate_number,
            certificate_path: path.clone(),
            issued_at: self.clock.now(),
            download_count: 0,
            verified_at: None,
            verification_notes: None,
        };

        match self.commit_certificate(&cert, participant.id).await {
            Ok(()) => {
                info!(
                    event_id = %event.id,
                    certificate_number = %cert.certificate_number,
                    "certificate issued"
                );
                Ok(cert)
            }
            Err(e) => {
                if let Err(del) = self.store.delete(&path).await {
                    warn!(path = %path, error = %del, "failed to remove orphaned artifact");
                }
                Err(e)
            }
        }
    }

    async fn commit_certificate(
        &self,
        cert: &Certificate,
        participant_row_id: Uuid,
    ) -> Result<(), EngineError> {
        let mut tx = self.pool.begin().await.map_err(EngineError::Database)?;

        if !CertificatesRepo::insert_tx(&mut tx, cert).await? {
            tx.rollback().await.map_err(EngineError::Database)?;
            return Err(EngineError::AlreadyIssued);
        }
        ParticipantsRepo::mark_certified_tx(&mut tx, participant_row_id).await?;

        tx.commit().await.map_err(EngineError::Database)?;
        Ok(())
    }
}
