//! HTTP DTOs for the billing endpoints.

use serde::{Deserialize, Serialize};

use crate::application::handlers::CreateCheckoutCommand;
use crate::ports::CheckoutSession;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /api/stripe/checkout`. Every field is validated downstream.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    #[serde(default)]
    pub plan_id: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl From<CheckoutRequest> for CreateCheckoutCommand {
    fn from(req: CheckoutRequest) -> Self {
        CreateCheckoutCommand {
            plan_id: req.plan_id,
            interval: req.interval,
            user_id: req.user_id,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub session_id: String,
}

impl From<CheckoutSession> for CheckoutResponse {
    fn from(session: CheckoutSession) -> Self {
        Self {
            session_id: session.id,
        }
    }
}

/// Acknowledgement returned for every accepted webhook delivery.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAck {
    pub received: bool,
}

impl WebhookAck {
    pub fn received() -> Self {
        Self { received: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkout_request_reads_camel_case() {
        let req: CheckoutRequest =
            serde_json::from_str(r#"{"planId":"pro","interval":"yearly","userId":"u1"}"#).unwrap();
        assert_eq!(req.plan_id.as_deref(), Some("pro"));
        assert_eq!(req.interval.as_deref(), Some("yearly"));
        assert_eq!(req.user_id.as_deref(), Some("u1"));
    }

    #[test]
    fn checkout_request_tolerates_missing_fields() {
        let req: CheckoutRequest = serde_json::from_str(r#"{"planId":"unknown"}"#).unwrap();
        assert!(req.user_id.is_none());
        assert!(req.interval.is_none());
    }

    #[test]
    fn checkout_response_is_camel_case() {
        let body = serde_json::to_value(CheckoutResponse {
            session_id: "cs_1".to_string(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"sessionId": "cs_1"}));
    }
}
