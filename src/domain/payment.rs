use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Expired,
}

impl PaymentStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Paid => "PAID",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Expired => "EXPIRED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "PENDING" => Some(PaymentStatus::Pending),
            "PAID" | "SUCCEEDED" | "SETTLED" => Some(PaymentStatus::Paid),
            "FAILED" => Some(PaymentStatus::Failed),
            "EXPIRED" => Some(PaymentStatus::Expired),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    VirtualAccount,
    Ewallet,
    CreditCard,
}

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMethod::VirtualAccount => "VIRTUAL_ACCOUNT",
            PaymentMethod::Ewallet => "EWALLET",
            PaymentMethod::CreditCard => "CREDIT_CARD",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "VIRTUAL_ACCOUNT" => Some(PaymentMethod::VirtualAccount),
            "EWALLET" => Some(PaymentMethod::Ewallet),
            "CREDIT_CARD" => Some(PaymentMethod::CreditCard),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub external_id: String,
    pub gateway_payment_id: Option<String>,
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub payment_method: PaymentMethod,
    pub payment_channel: Option<String>,
    pub ticket_type: Option<String>,
    pub quantity: i32,
    pub price_per_ticket_minor: i64,
    pub ticket_number: String,
    pub is_early_bird: bool,
    pub discount_amount_minor: i64,
    pub discount_code: Option<String>,
    pub attendee_info: serde_json::Value,
    pub requires_approval: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub approved_by: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl Payment {
    /// Paid, but gated on a manual approval that has not happened yet.
    pub fn is_pending_approval(&self) -> bool {
        self.requires_approval && self.approved_at.is_none() && self.status == PaymentStatus::Paid
    }
}

/// Ticket selection supplied at checkout. Discount fields are opaque,
/// already resolved by an external pricing step.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketSelection {
    pub ticket_type: Option<String>,
    pub quantity: i32,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_channel: Option<String>,
    #[serde(default)]
    pub attendee_info: serde_json::Value,
    #[serde(default)]
    pub discount_code: Option<String>,
    #[serde(default)]
    pub discount_amount_minor: i64,
    #[serde(default)]
    pub external_id: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "IDR".to_string()
}

/// Minimum webhook payload consumed from the gateway. The raw payload is
/// stored verbatim alongside for audit.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayCallback {
    pub id: String,
    pub external_id: String,
    pub status: String,
    pub amount: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutResponse {
    pub payment_id: Uuid,
    pub external_id: String,
    pub gateway_payment_id: Option<String>,
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub ticket_number: String,
    pub is_early_bird: bool,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}
