//! Integration tests for Gilsenan Records.
//!
//! These tests exercise the storefront crates together across module
//! boundaries: the cart reducer feeding checkout session construction, the
//! metadata manifest round-trip that confirmation depends on, the JSON wire
//! contracts the web client is built against, and the once-per-session
//! order-confirmation guarantees at the database level.
//!
//! Most tests run fully in-process. The `order_confirmation` suite needs a
//! live `PostgreSQL` and connects via `STOREFRONT_DATABASE_URL` (or
//! `DATABASE_URL`); without either variable those tests return early, so a
//! plain `cargo test` stays green on machines with no database. Tests that
//! would need the Stripe API are deliberately absent; that boundary is
//! covered by the client's unit tests and exercised in staging.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests only
//! cargo test -p gilsenan-integration-tests
//!
//! # Including the database-backed suite
//! DATABASE_URL=postgres://localhost/gilsenan_test \
//!     cargo test -p gilsenan-integration-tests
//! ```
