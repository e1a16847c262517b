//! Order route handlers.
//!
//! `POST /orders` is the direct pay-on-delivery path. Unlike the original
//! site it does not trust the client's total: the server recomputes it from
//! the submitted lines plus flat shipping and rejects mismatches, and line
//! prices are validated against the live catalog inside the creation
//! transaction.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use gilsenan_core::cart::CartItem;
use gilsenan_core::{Email, OrderId, OrderStatus};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::{CustomerDetails, Order, OrderWithItems};
use crate::services::checkout::{direct_order_total, validate_order_items};
use crate::state::AppState;

/// Direct order request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub items: Vec<CartItem>,
    pub customer: CustomerDetails,
    /// Client-computed total; verified, never stored as-is.
    pub total: Decimal,
}

/// Status update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub status: OrderStatus,
}

/// List all orders with their items, newest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<OrderWithItems>>> {
    let orders = OrderRepository::new(state.pool()).list_with_items().await?;
    Ok(Json(orders))
}

/// Create a direct (pay-on-delivery) order.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<OrderWithItems>)> {
    validate_order_items(&request.items).map_err(AppError::BadRequest)?;
    let email = Email::parse(&request.customer.email)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    // Server-side invariant: the stored total is recomputed, not trusted.
    let total = direct_order_total(&request.items, &state.config().checkout);
    if total != request.total {
        return Err(AppError::BadRequest(format!(
            "total mismatch: expected {total}, got {}",
            request.total
        )));
    }

    let order = OrderRepository::new(state.pool())
        .create_direct(
            email.as_str(),
            &request.customer.shipping_block(),
            total,
            &request.items,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(order)))
}

/// Update an order's status (admin).
#[instrument(skip(state))]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateOrderRequest>,
) -> Result<Json<Order>> {
    let order = OrderRepository::new(state.pool())
        .update_status(OrderId::new(id), request.status)
        .await?;
    Ok(Json(order))
}
