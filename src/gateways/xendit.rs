use crate::gateways::{IntentRequest, IntentResult, PaymentGateway};
use anyhow::{anyhow, Result};
use serde_json::json;

pub struct XenditGateway {
    pub base_url: String,
    pub api_key: String,
    pub timeout_ms: u64,
    pub client: reqwest::Client,
}

#[async_trait::async_trait]
impl PaymentGateway for XenditGateway {
    fn name(&self) -> &'static str {
        "xendit"
    }

    async fn create_intent(&self, request: IntentRequest) -> Result<IntentResult> {
        let url = format!("{}/payment_requests", self.base_url);
        let body = json!({
            "reference_id": request.external_id,
            "amount": request.amount_minor,
            "currency": request.currency,
            "payment_method": request.payment_method,
            "channel_code": request.payment_channel,
        });

        let resp = self
            .client
            .post(url)
            .basic_auth(&self.api_key, Some(""))
            .json(&body)
            .timeout(std::time::Duration::from_millis(self.timeout_ms))
            .send()
            .await
            .map_err(|e| anyhow!("gateway request failed: {e}"))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(anyhow!(
                "gateway returned {}: {}",
                status.as_u16(),
                text.chars().take(200).collect::<String>()
            ));
        }

        let v: serde_json::Value = resp.json().await?;
        let id = v
            .get("id")
            .and_then(|id| id.as_str())
            .ok_or_else(|| anyhow!("gateway response missing id"))?;

        Ok(IntentResult {
            gateway_payment_id: id.to_string(),
        })
    }
}
