//! Domain models exchanged between the database layer and the JSON API.
//!
//! Wire names are camelCase to match the storefront client, which consumes
//! the same shapes the original site did (`customerEmail`, `createdAt`, ...).

pub mod order;
pub mod product;

pub use order::{
    CustomerDetails, DashboardStats, Order, OrderItem, OrderSummary, OrderSummaryItem,
    OrderWithItems, RecentOrder,
};
pub use product::{NewProduct, Product};
