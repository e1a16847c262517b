//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server errors to Sentry
//! before responding to the client. All route handlers return
//! `Result<T, AppError>`; the response body is always a JSON object of the
//! form `{"error": "..."}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::checkout::ManifestError;
use crate::stripe::StripeError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Stripe API operation failed.
    #[error("Stripe error: {0}")]
    Stripe(#[from] StripeError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The gateway has not confirmed this payment.
    #[error("Payment not completed")]
    PaymentNotCompleted,

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ManifestError> for AppError {
    fn from(err: ManifestError) -> Self {
        match err {
            // A session without a manifest cannot have come from our
            // checkout initiation; treat it as client error, not a crash.
            ManifestError::MissingManifest => {
                Self::BadRequest("session has no cart manifest".to_string())
            }
            ManifestError::Amount(e) => Self::BadRequest(e.to_string()),
            ManifestError::Encoding(e) => Self::Internal(format!("manifest encoding: {e}")),
        }
    }
}

impl AppError {
    /// Whether this error should be captured to Sentry.
    const fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::Internal(_)
                | Self::Stripe(_)
                | Self::Database(
                    RepositoryError::Database(_) | RepositoryError::DataCorruption(_)
                )
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => StatusCode::NOT_FOUND,
                RepositoryError::Conflict(_) | RepositoryError::InsufficientStock(_) => {
                    StatusCode::CONFLICT
                }
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Stripe(StripeError::SessionNotFound(_)) => StatusCode::NOT_FOUND,
            Self::Stripe(_) => StatusCode::BAD_GATEWAY,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::PaymentNotCompleted => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(err) => match err {
                RepositoryError::NotFound => "Not found".to_string(),
                RepositoryError::InsufficientStock(id) => {
                    format!("Insufficient stock for product {id}")
                }
                RepositoryError::Conflict(msg) => msg.clone(),
                RepositoryError::Database(_) | RepositoryError::DataCorruption(_) => {
                    "Internal server error".to_string()
                }
            },
            Self::Stripe(StripeError::SessionNotFound(_)) => "Checkout session not found".to_string(),
            Self::Stripe(_) => "Payment service error".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            Self::NotFound(msg) => format!("Not found: {msg}"),
            Self::BadRequest(msg) => msg.clone(),
            Self::PaymentNotCompleted => "Payment not completed".to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
