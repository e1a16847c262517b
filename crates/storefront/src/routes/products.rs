//! Catalog route handlers.
//!
//! Reads serve the public browsing pages; mutations are the admin
//! back-office operations (field validation only, no workflow logic).

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;

use gilsenan_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::models::{NewProduct, Product};
use crate::state::AppState;

/// List all products, newest first.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list().await?;
    Ok(Json(products))
}

/// Fetch a single product.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<Product>> {
    let product = ProductRepository::new(state.pool())
        .get(ProductId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    Ok(Json(product))
}

/// Create a product (admin).
#[instrument(skip(state, input))]
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewProduct>,
) -> Result<(StatusCode, Json<Product>)> {
    input.validate().map_err(AppError::BadRequest)?;
    let product = ProductRepository::new(state.pool()).create(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Replace a product's fields (admin).
#[instrument(skip(state, input))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(input): Json<NewProduct>,
) -> Result<Json<Product>> {
    input.validate().map_err(AppError::BadRequest)?;
    let product = ProductRepository::new(state.pool())
        .update(ProductId::new(id), &input)
        .await?;
    Ok(Json(product))
}

/// Delete a product (admin).
///
/// Historical order lines keep their snapshots; only the live catalog row
/// goes away.
#[instrument(skip(state))]
pub async fn destroy(State(state): State<AppState>, Path(id): Path<i32>) -> Result<StatusCode> {
    ProductRepository::new(state.pool())
        .delete(ProductId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
