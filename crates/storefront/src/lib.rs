//! Gilsenan Records Storefront - Public JSON API.
//!
//! # Architecture
//!
//! - Axum web framework serving a JSON API (the web client is a separate
//!   presentation layer and is out of scope here)
//! - `PostgreSQL` via sqlx for catalog, orders, and order lines
//! - Stripe hosted checkout for payment; the server never touches card data
//!
//! # Checkout flow
//!
//! 1. The client posts its cart and customer form to
//!    `/create-checkout-session`; nothing is persisted, the cart manifest is
//!    embedded as session metadata and the shopper is redirected to Stripe.
//! 2. Stripe redirects back with an opaque session id.
//! 3. `/verify-payment` re-reads the session from Stripe (the gateway is the
//!    payment authority), then creates the order, its line items, and the
//!    stock decrements in one transaction - exactly once per session, which
//!    the unique `checkout_session_id` column enforces.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod stripe;
