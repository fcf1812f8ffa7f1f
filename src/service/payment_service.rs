use crate::clock::SharedClock;
use crate::domain::participant::{format_ticket_number, generate_attendance_token};
use crate::domain::payment::{CheckoutResponse, Payment, TicketSelection};
use crate::error::EngineError;
use crate::gateways::{IntentRequest, PaymentGateway};
use crate::repo::events_repo::EventsRepo;
use crate::repo::participants_repo::ParticipantsRepo;
use crate::repo::payments_repo::{NewPayment, PaymentsRepo};
use crate::windows::{evaluator, pricing};
use chrono::Duration;
use rand::Rng;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

#[derive(Clone)]
pub struct PaymentService {
    pub pool: PgPool,
    pub events_repo: EventsRepo,
    pub payments_repo: PaymentsRepo,
    pub gateway: Arc<dyn PaymentGateway>,
    pub clock: SharedClock,
    pub payment_ttl_hours: i64,
}

impl PaymentService {
    pub async fn checkout(
        &self,
        event_id: Uuid,
        user_id: Uuid,
        selection: TicketSelection,
    ) -> Result<CheckoutResponse, EngineError> {
        let event = self
            .events_repo
            .find(event_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("event {event_id}")))?;

        if !event.is_paid_event {
            return Err(EngineError::Ineligible(
                "free event, use registration instead of checkout".to_string(),
            ));
        }
        if selection.quantity < 1 {
            return Err(EngineError::Validation("quantity must be at least 1".to_string()));
        }

        let base_price = event
            .base_price_minor(selection.ticket_type.as_deref())
            .ok_or_else(|| {
                EngineError::Validation(match &selection.ticket_type {
                    Some(t) => format!("unknown ticket type: {t}"),
                    None => "ticket_type is required for this event".to_string(),
                })
            })?;

        let now = self.clock.now();
        if !evaluator::is_registration_open(&event, now) {
            return Err(EngineError::Ineligible("registration is closed".to_string()));
        }

        let prior = self.payments_repo.sum_paid_quantity(event.id, user_id).await?;
        if !evaluator::can_user_buy_tickets(&event, prior, selection.quantity) {
            return Err(EngineError::Ineligible(format!(
                "per-user ticket limit of {} exceeded",
                event.max_tickets_per_user
            )));
        }

        let is_early_bird = evaluator::is_early_bird_active(&event, now);
        let price_per_ticket = if is_early_bird {
            pricing::early_bird_price_minor(base_price, event.early_bird_discount_percent)
        } else {
            base_price
        };

        let gross = price_per_ticket * selection.quantity as i64;
        if selection.discount_amount_minor < 0 || selection.discount_amount_minor > gross {
            return Err(EngineError::Validation(
                "discount_amount is out of bounds".to_string(),
            ));
        }
        let amount = pricing::compute_amount_minor(
            price_per_ticket,
            selection.quantity,
            selection.discount_amount_minor,
        );

        let external_id = selection
            .external_id
            .clone()
            .unwrap_or_else(|| format!("pay_{}", Uuid::new_v4()));

        // Replayed checkout with a known idempotency key returns the
        // original payment instead of creating a second one. The replay
        // must carry the same selection; the key reused with a different
        // payload is a conflict, never a silent success at the old amount.
        if let Some(existing) = self.payments_repo.find_by_external_id(&external_id).await? {
            if existing.event_id != event.id
                || existing.user_id != user_id
                || !replay_matches(&existing, &selection)
            {
                return Err(EngineError::Conflict(
                    "external_id was already used for a different checkout".to_string(),
                ));
            }
            return Ok(to_response(&existing));
        }

        let ticket_number =
            format_ticket_number(event.event_seq, rand::thread_rng().gen_range(0..1_000_000));

        let intent = self
            .gateway
            .create_intent(IntentRequest {
                external_id: external_id.clone(),
                amount_minor: amount,
                currency: selection.currency.clone(),
                payment_method: selection.payment_method.as_str().to_string(),
                payment_channel: selection.payment_channel.clone(),
            })
            .await
            .map_err(|e| EngineError::ExternalDependency(e.to_string()))?;

        let payment = match self
            .payments_repo
            .insert(&NewPayment {
                id: Uuid::new_v4(),
                event_id: event.id,
                user_id,
                external_id,
                gateway_payment_id: Some(intent.gateway_payment_id),
                amount_minor: amount,
                price_per_ticket_minor: price_per_ticket,
                ticket_number,
                is_early_bird,
                requires_approval: event.requires_approval,
                expires_at: now + Duration::hours(self.payment_ttl_hours),
                selection,
            })
            .await
        {
            Ok(p) => p,
            // Two first-time checkouts racing on the same external_id: the
            // loser hits the unique constraint, not a server error.
            Err(e) if is_unique_violation(&e) => {
                return Err(EngineError::Conflict(
                    "concurrent checkout with the same external_id".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            payment_id = %payment.id,
            event_id = %event.id,
            amount_minor = payment.amount_minor,
            "payment created"
        );
        Ok(to_response(&payment))
    }

    /// Single manual approval for approval-gated paid payments. Returns
    /// false (no error) when the payment is not pending approval, matching
    /// the silent-failure contract. Registration runs through the same
    /// idempotent upsert as the webhook path, in the same transaction.
    pub async fn approve(&self, payment_id: Uuid, approver: Uuid) -> Result<bool, EngineError> {
        let payment = self
            .payments_repo
            .find(payment_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("payment {payment_id}")))?;

        let event = self
            .events_repo
            .find(payment.event_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("event {}", payment.event_id)))?;

        let now = self.clock.now();
        let mut tx = self.pool.begin().await.map_err(EngineError::Database)?;

        if !PaymentsRepo::approve_tx(&mut tx, payment.id, approver, now).await? {
            tx.rollback().await.map_err(EngineError::Database)?;
            return Ok(false);
        }

        let token = generate_attendance_token(&mut rand::thread_rng());
        ParticipantsRepo::ensure_registered_tx(
            &mut tx,
            event.id,
            event.event_seq,
            payment.user_id,
            &token,
            now,
        )
        .await?;

        tx.commit().await.map_err(EngineError::Database)?;
        info!(payment_id = %payment.id, approver = %approver, "payment approved");
        Ok(true)
    }
}

/// True when a replayed checkout carries the same ticket selection as the
/// stored payment for its idempotency key.
pub fn replay_matches(payment: &Payment, selection: &TicketSelection) -> bool {
    payment.ticket_type == selection.ticket_type
        && payment.quantity == selection.quantity
        && payment.payment_method == selection.payment_method
        && payment.discount_amount_minor == selection.discount_amount_minor
        && payment.discount_code == selection.discount_code
        && payment.currency == selection.currency
}

fn is_unique_violation(e: &anyhow::Error) -> bool {
    e.downcast_ref::<sqlx::Error>()
        .and_then(|se| se.as_database_error())
        .map(|db| db.is_unique_violation())
        .unwrap_or(false)
}

fn to_response(p: &Payment) -> CheckoutResponse {
    CheckoutResponse {
        payment_id: p.id,
        external_id: p.external_id.clone(),
        gateway_payment_id: p.gateway_payment_id.clone(),
        amount_minor: p.amount_minor,
        currency: p.currency.clone(),
        status: p.status,
        ticket_number: p.ticket_number.clone(),
        is_early_bird: p.is_early_bird,
        expires_at: p.expires_at,
    }
}
