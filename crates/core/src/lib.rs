//! Gilsenan Records Core - Shared types library.
//!
//! This crate provides common types used across the Gilsenan Records
//! components:
//! - `storefront` - Public JSON API (catalog, checkout, orders, admin stats)
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP clients. This keeps it lightweight and allows
//! it to be used anywhere, including in unit tests that never touch a
//! database.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails, money conversions, and order status
//! - [`cart`] - The serializable shopping cart state and its reducers

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use types::*;
