//! Order models: persisted orders, line items, and checkout input shapes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gilsenan_core::{OrderId, OrderItemId, OrderStatus, ProductId};

/// A persisted purchase record.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub total: Decimal,
    pub customer_email: String,
    pub shipping_address: String,
    pub status: OrderStatus,
    /// Gateway correlation token; `None` for direct (pay-on-delivery) orders.
    pub checkout_session_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One line of an order.
///
/// `title`, `artist`, and `price` are point-in-time snapshots: later catalog
/// edits or deletions never alter a historical order. `product_id` is kept
/// as a soft reference to the live catalog and may be `None` if the product
/// was since deleted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    pub product_id: Option<ProductId>,
    pub title: String,
    pub artist: String,
    pub quantity: i32,
    pub price: Decimal,
}

/// An order together with its line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Customer contact and shipping fields from the checkout form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub postcode: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl CustomerDetails {
    /// Render the multi-line shipping block stored on the order.
    #[must_use]
    pub fn shipping_block(&self) -> String {
        let mut block = format!(
            "{} {}\n{}\n{}, {}\n{}\nEmail: {}",
            self.first_name,
            self.last_name,
            self.address,
            self.city,
            self.postcode,
            self.country,
            self.email
        );
        if let Some(phone) = &self.phone {
            block.push_str("\nPhone: ");
            block.push_str(phone);
        }
        block
    }
}

/// The confirmation response returned to the client after payment.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub id: OrderId,
    pub total: Decimal,
    pub customer_email: String,
    pub items: Vec<OrderSummaryItem>,
}

/// One line of an order summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummaryItem {
    pub title: String,
    pub artist: String,
    pub quantity: i32,
    pub price: Decimal,
}

impl From<OrderWithItems> for OrderSummary {
    fn from(order: OrderWithItems) -> Self {
        Self {
            id: order.order.id,
            total: order.order.total,
            customer_email: order.order.customer_email,
            items: order
                .items
                .into_iter()
                .map(|item| OrderSummaryItem {
                    title: item.title,
                    artist: item.artist,
                    quantity: item.quantity,
                    price: item.price,
                })
                .collect(),
        }
    }
}

/// Aggregate numbers for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_products: i64,
    pub orders_today: i64,
    /// Revenue summed over completed and shipped orders.
    pub total_revenue: Decimal,
    pub featured_items: i64,
    /// Products with fewer than five copies on hand.
    pub low_stock_items: i64,
    pub recent_orders: Vec<RecentOrder>,
}

/// A row of the dashboard's recent-orders list.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: OrderId,
    pub customer_email: String,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            first_name: "Aoife".to_string(),
            last_name: "Byrne".to_string(),
            email: "aoife@example.ie".to_string(),
            address: "4 Market Square".to_string(),
            city: "Kells".to_string(),
            postcode: "A82 XY12".to_string(),
            country: "Ireland".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_shipping_block_without_phone() {
        let block = customer().shipping_block();
        assert_eq!(
            block,
            "Aoife Byrne\n4 Market Square\nKells, A82 XY12\nIreland\nEmail: aoife@example.ie"
        );
    }

    #[test]
    fn test_shipping_block_with_phone() {
        let mut customer = customer();
        customer.phone = Some("+353 87 123 4567".to_string());
        let block = customer.shipping_block();
        assert!(block.ends_with("Phone: +353 87 123 4567"));
    }

    #[test]
    fn test_customer_details_camel_case() {
        let json = r#"{
            "firstName": "Aoife",
            "lastName": "Byrne",
            "email": "aoife@example.ie",
            "address": "4 Market Square",
            "city": "Kells",
            "postcode": "A82 XY12",
            "country": "Ireland"
        }"#;
        let customer: CustomerDetails = serde_json::from_str(json).expect("deserialize");
        assert_eq!(customer.first_name, "Aoife");
        assert!(customer.phone.is_none());
    }
}
