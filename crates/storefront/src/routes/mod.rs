//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Liveness check
//! GET    /health/ready              - Readiness check (database ping)
//!
//! # Catalog
//! GET    /products                  - List products, newest first
//! POST   /products                  - Create product (admin)
//! GET    /products/{id}             - Fetch product
//! PUT    /products/{id}             - Update product (admin)
//! DELETE /products/{id}             - Delete product (admin)
//!
//! # Orders
//! GET    /orders                    - List orders with nested items
//! POST   /orders                    - Direct pay-on-delivery order
//! PUT    /orders/{id}               - Update order status (admin)
//!
//! # Checkout
//! POST   /create-checkout-session   - Mint a hosted gateway session
//! POST   /verify-payment            - Confirm payment, create order once
//!
//! # Admin
//! GET    /admin/stats               - Dashboard aggregates
//! ```

pub mod admin;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::destroy),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", put(orders::update_status))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .route("/create-checkout-session", post(checkout::create_session))
        .route("/verify-payment", post(checkout::verify_payment))
        .route("/admin/stats", get(admin::stats))
}
