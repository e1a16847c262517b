//! Stripe API response types.
//!
//! Only the fields the storefront reads are modeled; everything else in
//! Stripe's (large) session object is ignored during deserialization.

use std::collections::HashMap;

use serde::Deserialize;

/// Payment status of a checkout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Payment captured; the only status an order may be created from.
    Paid,
    /// Shopper has not (successfully) paid.
    Unpaid,
    /// Zero-amount session; treated as not paid for a CD shop.
    NoPaymentRequired,
}

impl PaymentStatus {
    /// Whether this status authorizes order creation.
    #[must_use]
    pub const fn is_paid(self) -> bool {
        matches!(self, Self::Paid)
    }
}

/// A Stripe Checkout Session, as returned by create and retrieve.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    /// Opaque session identifier (`cs_...`); the correlation token.
    pub id: String,
    /// Hosted payment page URL (present on freshly created sessions).
    #[serde(default)]
    pub url: Option<String>,
    /// Authoritative payment status.
    pub payment_status: PaymentStatus,
    /// Total charged, in minor currency units (includes shipping).
    #[serde(default)]
    pub amount_total: Option<i64>,
    /// Email the shopper gave the gateway.
    #[serde(default)]
    pub customer_email: Option<String>,
    /// Metadata attached at session creation (carries the cart manifest).
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// Error envelope Stripe wraps failures in.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorEnvelope {
    pub error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub error_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_paid_session() {
        let json = r#"{
            "id": "cs_test_a1b2c3",
            "object": "checkout.session",
            "payment_status": "paid",
            "amount_total": 6248,
            "customer_email": "aoife@example.ie",
            "metadata": {"items": "[]"}
        }"#;
        let session: CheckoutSession = serde_json::from_str(json).expect("deserialize");
        assert_eq!(session.id, "cs_test_a1b2c3");
        assert!(session.payment_status.is_paid());
        assert_eq!(session.amount_total, Some(6248));
        assert_eq!(session.metadata.get("items").map(String::as_str), Some("[]"));
    }

    #[test]
    fn test_deserialize_unpaid_session_minimal() {
        let json = r#"{"id": "cs_test_x", "payment_status": "unpaid"}"#;
        let session: CheckoutSession = serde_json::from_str(json).expect("deserialize");
        assert!(!session.payment_status.is_paid());
        assert!(session.amount_total.is_none());
        assert!(session.metadata.is_empty());
    }

    #[test]
    fn test_no_payment_required_is_not_paid() {
        let json = r#"{"id": "cs_test_x", "payment_status": "no_payment_required"}"#;
        let session: CheckoutSession = serde_json::from_str(json).expect("deserialize");
        assert!(!session.payment_status.is_paid());
    }

    #[test]
    fn test_deserialize_error_envelope() {
        let json = r#"{"error": {"message": "No such checkout session", "type": "invalid_request_error"}}"#;
        let envelope: ApiErrorEnvelope = serde_json::from_str(json).expect("deserialize");
        assert_eq!(
            envelope.error.message.as_deref(),
            Some("No such checkout session")
        );
        assert_eq!(
            envelope.error.error_type.as_deref(),
            Some("invalid_request_error")
        );
    }
}
