//! JSON wire contract tests.
//!
//! The web client is built against camelCase field names and string-encoded
//! decimal amounts. These tests pin that contract so a rename in the Rust
//! models cannot silently break the client.

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde_json::{Value, json};

use gilsenan_core::{OrderId, OrderItemId, OrderStatus, ProductId};
use gilsenan_storefront::models::{
    Order, OrderItem, OrderSummary, OrderWithItems, RecentOrder,
};

fn timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse().expect("valid timestamp")
}

fn sample_order() -> OrderWithItems {
    let created = timestamp("2026-03-14T10:30:00Z");
    OrderWithItems {
        order: Order {
            id: OrderId::new(42),
            total: dec!(62.48),
            customer_email: "aoife@example.ie".to_string(),
            shipping_address: "Aoife Byrne\n4 Market Square\nKells, A82 XY12\nIreland\nEmail: aoife@example.ie".to_string(),
            status: OrderStatus::Completed,
            checkout_session_id: Some("cs_test_a1b2c3".to_string()),
            created_at: created,
            updated_at: created,
        },
        items: vec![OrderItem {
            id: OrderItemId::new(7),
            product_id: Some(ProductId::new(1)),
            title: "Wexford Melodies".to_string(),
            artist: "Coastal Irish Band".to_string(),
            quantity: 1,
            price: dec!(17.50),
        }],
    }
}

#[test]
fn order_with_items_serializes_flat_and_camel_case() {
    let value = serde_json::to_value(sample_order()).expect("serialize");

    // Order fields are flattened alongside the items array.
    assert_eq!(value["id"], json!(42));
    assert_eq!(value["customerEmail"], json!("aoife@example.ie"));
    assert_eq!(value["checkoutSessionId"], json!("cs_test_a1b2c3"));
    assert_eq!(value["status"], json!("completed"));
    assert_eq!(value["total"], json!("62.48"));
    assert_eq!(value["items"][0]["productId"], json!(1));
    assert_eq!(value["items"][0]["price"], json!("17.50"));
    assert!(value.get("customer_email").is_none());
}

#[test]
fn direct_order_omits_session_id_as_null() {
    let mut order = sample_order();
    order.order.checkout_session_id = None;
    let value = serde_json::to_value(order).expect("serialize");
    assert_eq!(value["checkoutSessionId"], Value::Null);
}

#[test]
fn order_summary_exposes_only_receipt_fields() {
    let summary = OrderSummary::from(sample_order());
    let value = serde_json::to_value(summary).expect("serialize");

    assert_eq!(value["id"], json!(42));
    assert_eq!(value["total"], json!("62.48"));
    assert_eq!(value["items"][0]["title"], json!("Wexford Melodies"));
    // Receipt lines never leak catalog ids or the shipping address.
    assert!(value["items"][0].get("productId").is_none());
    assert!(value.get("shippingAddress").is_none());
}

#[test]
fn recent_order_serializes_camel_case() {
    let recent = RecentOrder {
        id: OrderId::new(3),
        customer_email: "sean@example.ie".to_string(),
        total: dec!(15.99),
        created_at: timestamp("2026-03-14T09:00:00Z"),
    };
    let value = serde_json::to_value(recent).expect("serialize");
    assert_eq!(value["customerEmail"], json!("sean@example.ie"));
    assert!(value.get("createdAt").is_some());
}

#[test]
fn order_status_round_trips_as_lowercase() {
    for (status, expected) in [
        (OrderStatus::Pending, "pending"),
        (OrderStatus::Completed, "completed"),
        (OrderStatus::Shipped, "shipped"),
    ] {
        let value = serde_json::to_value(status).expect("serialize");
        assert_eq!(value, json!(expected));
        let back: OrderStatus = serde_json::from_value(value).expect("deserialize");
        assert_eq!(back, status);
    }
}
