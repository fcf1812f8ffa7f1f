use anyhow::Result;
use serde::{Deserialize, Serialize};

pub mod mock;
pub mod xendit;

/// Outbound "create payment intent" call. Inputs mirror what the checkout
/// flow has computed; the gateway answers with its own payment id, which
/// later keys inbound status callbacks.
#[derive(Debug, Clone)]
pub struct IntentRequest {
    pub external_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub payment_method: String,
    pub payment_channel: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntentResult {
    pub gateway_payment_id: String,
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    fn name(&self) -> &'static str;

    async fn create_intent(&self, request: IntentRequest) -> Result<IntentResult>;
}
