//! Stripe REST client implementation.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use tracing::{debug, instrument};

use crate::config::StripeConfig;

use super::StripeError;
use super::types::{ApiErrorEnvelope, CheckoutSession};

/// Request timeout for gateway calls; confirmation must fail fast enough to
/// stay inside an ordinary request timeout and be retried.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Client for the Stripe Checkout Sessions API.
#[derive(Clone)]
pub struct StripeClient {
    inner: Arc<StripeClientInner>,
}

struct StripeClientInner {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl StripeClient {
    /// Create a new Stripe client.
    ///
    /// # Panics
    ///
    /// Panics if the underlying HTTP client cannot be constructed, which
    /// with these static options only happens when no TLS backend is
    /// available at all. A client without the request timeout is never
    /// handed out.
    #[must_use]
    pub fn new(config: &StripeConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("HTTP client with static options");

        Self {
            inner: Arc::new(StripeClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_string(),
                secret_key: config.secret_key.expose_secret().to_string(),
            }),
        }
    }

    /// Create a hosted checkout session.
    ///
    /// `form` is the flat list of Stripe form-encoded pairs built by
    /// [`crate::services::checkout::build_session_form`].
    ///
    /// # Errors
    ///
    /// Returns `StripeError::Api` if Stripe rejects the request, or
    /// `StripeError::Http` on transport failure.
    #[instrument(skip(self, form))]
    pub async fn create_checkout_session(
        &self,
        form: &[(String, String)],
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!("{}/v1/checkout/sessions", self.inner.api_base);

        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(&self.inner.secret_key)
            .form(form)
            .send()
            .await?;

        let session = Self::parse_session_response(response).await?;
        debug!(session_id = %session.id, "checkout session created");
        Ok(session)
    }

    /// Retrieve a checkout session's authoritative state by id.
    ///
    /// # Errors
    ///
    /// Returns `StripeError::SessionNotFound` for an unknown id,
    /// `StripeError::Api` for other Stripe rejections, or
    /// `StripeError::Http` on transport failure.
    #[instrument(skip(self))]
    pub async fn retrieve_checkout_session(
        &self,
        session_id: &str,
    ) -> Result<CheckoutSession, StripeError> {
        let url = format!(
            "{}/v1/checkout/sessions/{}",
            self.inner.api_base, session_id
        );

        let response = self
            .inner
            .client
            .get(&url)
            .bearer_auth(&self.inner.secret_key)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StripeError::SessionNotFound(session_id.to_string()));
        }

        Self::parse_session_response(response).await
    }

    /// Decode a session from a response, or surface Stripe's error message.
    async fn parse_session_response(
        response: reqwest::Response,
    ) -> Result<CheckoutSession, StripeError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.message)
                .unwrap_or_else(|| "unrecognized error response".to_string());
            return Err(StripeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    #[test]
    fn test_new_builds_client_with_timeout() {
        let config = StripeConfig {
            secret_key: SecretString::from("sk_test_4eC39HqLyjWDarjtT1zdp7dc"),
            api_base: "https://api.stripe.com/".to_string(),
        };

        let client = StripeClient::new(&config);
        assert_eq!(client.inner.api_base, "https://api.stripe.com");
    }
}
