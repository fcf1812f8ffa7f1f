use crate::gateways::{IntentRequest, IntentResult, PaymentGateway};
use anyhow::{bail, Result};

pub struct MockGateway {
    pub behavior: String,
}

#[async_trait::async_trait]
impl PaymentGateway for MockGateway {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn create_intent(&self, request: IntentRequest) -> Result<IntentResult> {
        match self.behavior.as_str() {
            "ALWAYS_ERROR" => bail!("mock gateway declined intent for {}", request.external_id),
            _ => Ok(IntentResult {
                gateway_payment_id: format!("mock_pay_{}", uuid::Uuid::new_v4()),
            }),
        }
    }
}
