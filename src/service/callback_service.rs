use crate::clock::SharedClock;
use crate::domain::participant::generate_attendance_token;
use crate::domain::payment::{GatewayCallback, PaymentStatus};
use crate::error::EngineError;
use crate::repo::events_repo::EventsRepo;
use crate::repo::participants_repo::ParticipantsRepo;
use crate::repo::payments_repo::PaymentsRepo;
use crate::repo::transactions_repo::TransactionsRepo;
use crate::statemachine::transitions::{plan_transition, TransitionPlan};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallbackOutcome {
    Applied(PaymentStatus),
    /// Redelivered callback for a status already applied; treated as
    /// success without re-running side effects.
    Duplicate,
}

#[derive(Clone)]
pub struct CallbackService {
    pub pool: PgPool,
    pub events_repo: EventsRepo,
    pub clock: SharedClock,
}

impl CallbackService {
    /// Applies an inbound gateway status callback. Gateways deliver
    /// at-least-once and possibly concurrently; the row lock plus the
    /// `status = 'PENDING'` conditional update keep the side effects
    /// exactly-once. Everything the PAID path touches (status, participant
    /// upsert, transaction mirror) commits in one unit.
    pub async fn apply_gateway_callback(
        &self,
        raw: serde_json::Value,
    ) -> Result<CallbackOutcome, EngineError> {
        let payload: GatewayCallback = serde_json::from_value(raw.clone())
            .map_err(|e| EngineError::Validation(format!("malformed callback payload: {e}")))?;

        let incoming = PaymentStatus::parse(&payload.status).ok_or_else(|| {
            EngineError::Validation(format!("unrecognized callback status: {}", payload.status))
        })?;

        let mut tx = self.pool.begin().await.map_err(EngineError::Database)?;

        let payment = PaymentsRepo::find_by_gateway_id_tx(&mut tx, &payload.id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("payment for gateway id {}", payload.id)))?;

        if payload.external_id != payment.external_id {
            return Err(EngineError::Validation(
                "callback external_id does not match payment".to_string(),
            ));
        }
        if payload.amount != payment.amount_minor {
            return Err(EngineError::Validation(format!(
                "callback amount {} does not match payment amount {}",
                payload.amount, payment.amount_minor
            )));
        }

        let status = match plan_transition(payment.status, incoming) {
            TransitionPlan::Apply(s) => s,
            TransitionPlan::Duplicate => {
                tx.rollback().await.map_err(EngineError::Database)?;
                info!(payment_id = %payment.id, status = incoming.as_str(), "duplicate callback, no-op");
                return Ok(CallbackOutcome::Duplicate);
            }
            TransitionPlan::Rejected => {
                return Err(EngineError::Conflict(format!(
                    "cannot move payment from {} to {}",
                    payment.status.as_str(),
                    incoming.as_str()
                )));
            }
        };

        let now = self.clock.now();
        let paid_at = (status == PaymentStatus::Paid).then_some(now);
        let applied =
            PaymentsRepo::apply_terminal_status_tx(&mut tx, payment.id, status, paid_at, &raw)
                .await?;
        if !applied {
            return Err(EngineError::Conflict(
                "payment status changed concurrently".to_string(),
            ));
        }

        if status == PaymentStatus::Paid {
            TransactionsRepo::insert_tx(&mut tx, payment.id, payment.amount_minor).await?;

            if payment.requires_approval {
                info!(payment_id = %payment.id, "paid, awaiting manual approval");
            } else {
                // Soft deletion must not strand a paid payment in PENDING
                // while the gateway retries the callback.
                let event = self
                    .events_repo
                    .find_including_deleted(payment.event_id)
                    .await?
                    .ok_or_else(|| {
                        EngineError::NotFound(format!("event {}", payment.event_id))
                    })?;

                let token = generate_attendance_token(&mut rand::thread_rng());
                let (participant, inserted) = ParticipantsRepo::ensure_registered_tx(
                    &mut tx,
                    event.id,
                    event.event_seq,
                    payment.user_id,
                    &token,
                    now,
                )
                .await?;
                if inserted {
                    info!(
                        payment_id = %payment.id,
                        registration_number = %participant.registration_number,
                        "participant registered from paid callback"
                    );
                }
            }
        } else {
            warn!(payment_id = %payment.id, status = status.as_str(), "payment reached terminal failure state");
        }

        tx.commit().await.map_err(EngineError::Database)?;
        Ok(CallbackOutcome::Applied(status))
    }
}
