//! Checkout route handlers: session initiation and payment confirmation.
//!
//! `POST /create-checkout-session` mints a hosted gateway session from the
//! client's cart without persisting anything. `POST /verify-payment` is the
//! confirmation step the success page calls: it re-reads the session from
//! the gateway, gates on `payment_status`, and creates the order at most
//! once per session.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use gilsenan_core::cart::CartItem;
use gilsenan_core::from_minor_units;

use crate::db::{ConfirmedOrder, OrderRepository};
use crate::error::{AppError, Result};
use crate::models::{CustomerDetails, OrderSummary};
use crate::services::checkout::{
    build_session_form, decode_customer_metadata, decode_items_metadata, validate_order_items,
};
use crate::state::AppState;

/// Email recorded when the gateway returns a session without one.
const FALLBACK_EMAIL: &str = "unknown@email.com";

/// Session initiation request body.
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub items: Vec<CartItem>,
    pub customer: CustomerDetails,
}

/// Session initiation response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionResponse {
    pub session_id: String,
    /// Hosted payment page the client redirects to.
    pub url: Option<String>,
}

/// Confirmation request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub session_id: String,
}

/// Create a hosted checkout session for the client's cart.
#[instrument(skip(state, request))]
pub async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>> {
    validate_order_items(&request.items).map_err(AppError::BadRequest)?;

    let form = build_session_form(
        &request.items,
        &request.customer,
        &state.config().checkout,
        state.config().base_url.as_str(),
    )?;
    let session = state.stripe().create_checkout_session(&form).await?;

    info!(session_id = %session.id, "checkout session created");
    Ok(Json(CreateSessionResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// Confirm a payment and create its order, at most once per session.
///
/// Safe to call any number of times for the same session: repeats and
/// concurrent calls all resolve to the same stored order.
#[instrument(skip(state), fields(session_id = %request.session_id))]
pub async fn verify_payment(
    State(state): State<AppState>,
    Json(request): Json<VerifyPaymentRequest>,
) -> Result<Json<OrderSummary>> {
    let session_id = request.session_id.trim();
    if session_id.is_empty() {
        return Err(AppError::BadRequest("sessionId is required".to_string()));
    }

    let session = state.stripe().retrieve_checkout_session(session_id).await?;
    if !session.payment_status.is_paid() {
        return Err(AppError::PaymentNotCompleted);
    }

    let repo = OrderRepository::new(state.pool());

    // Fast path for repeat confirmations; the unique constraint still
    // covers the race where two first calls arrive together.
    if let Some(existing) = repo.find_by_session(&session.id).await? {
        info!(order_id = %existing.order.id, "session already confirmed");
        return Ok(Json(OrderSummary::from(existing)));
    }

    let items = decode_items_metadata(&session.metadata)?;
    let customer = decode_customer_metadata(&session.metadata);

    let customer_email = customer
        .as_ref()
        .map(|c| c.email.clone())
        .or_else(|| session.customer_email.clone())
        .unwrap_or_else(|| FALLBACK_EMAIL.to_string());

    let shipping_address = customer.as_ref().map_or_else(
        || {
            format!(
                "Stripe Customer: {customer_email}\nStripe Session: {}",
                session.id
            )
        },
        CustomerDetails::shipping_block,
    );

    // The gateway's captured amount is authoritative for the stored total.
    let total = from_minor_units(session.amount_total.unwrap_or(0));

    let confirmed = repo
        .create_confirmed(&session.id, &customer_email, &shipping_address, total, &items)
        .await?;

    match &confirmed {
        ConfirmedOrder::Created(order) => {
            info!(order_id = %order.order.id, %total, "order created from confirmed payment");
        }
        ConfirmedOrder::AlreadyConfirmed(order) => {
            info!(order_id = %order.order.id, "lost confirmation race; returning existing order");
        }
    }

    Ok(Json(OrderSummary::from(confirmed.into_order())))
}
