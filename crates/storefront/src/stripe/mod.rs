//! Stripe hosted checkout client.
//!
//! # Architecture
//!
//! - Talks to the Stripe REST API over `reqwest` (form-encoded requests,
//!   JSON responses); no SDK dependency
//! - Only the two Checkout Session calls the storefront needs: create and
//!   retrieve
//! - Stripe is the payment authority: the storefront never records a sale
//!   the gateway has not confirmed as `paid`
//!
//! # Example
//!
//! ```rust,ignore
//! use gilsenan_storefront::stripe::StripeClient;
//!
//! let client = StripeClient::new(&config.stripe);
//! let session = client.create_checkout_session(&form_pairs).await?;
//! // ... shopper pays on Stripe's hosted page, then returns ...
//! let session = client.retrieve_checkout_session(&session.id).await?;
//! ```

mod client;
pub mod types;

pub use client::StripeClient;
pub use types::{CheckoutSession, PaymentStatus};

use thiserror::Error;

/// Errors that can occur when talking to the Stripe API.
#[derive(Debug, Error)]
pub enum StripeError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Stripe returned an error response.
    #[error("Stripe API error ({status}): {message}")]
    Api {
        /// HTTP status code of the error response.
        status: u16,
        /// Stripe's error message.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Checkout session not found.
    #[error("Checkout session not found: {0}")]
    SessionNotFound(String),
}
