//! Database operations for the storefront `PostgreSQL`.
//!
//! ## Tables
//!
//! - `products` - The sellable catalog (title, artist, price, stock)
//! - `orders` - Purchase records, correlated to gateway sessions via the
//!   unique `checkout_session_id` column
//! - `order_items` - Snapshot lines owned by an order
//!
//! All queries use the runtime sqlx API with typed row structs; every
//! multi-statement write (order + items + stock) runs inside a single
//! transaction so a failure leaves nothing partial behind.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p gilsenan-cli -- migrate
//! ```

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use gilsenan_core::ProductId;

pub mod orders;
pub mod products;
pub mod stats;

pub use orders::{ConfirmedOrder, OrderRepository};
pub use products::ProductRepository;

/// Errors from repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate checkout session).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// A stock decrement would drive inventory negative.
    #[error("insufficient stock for product {0}")]
    InsufficientStock(ProductId),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
