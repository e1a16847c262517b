//! Shared type definitions.
//!
//! - [`id`] - Newtype IDs for catalog and order entities
//! - [`email`] - Validated email address wrapper
//! - [`money`] - Decimal/minor-unit currency conversions
//! - [`status`] - Order lifecycle status

pub mod email;
pub mod id;
pub mod money;
pub mod status;

pub use email::{Email, EmailError};
pub use id::{OrderId, OrderItemId, ProductId};
pub use money::{MoneyError, from_minor_units, to_minor_units};
pub use status::OrderStatus;
