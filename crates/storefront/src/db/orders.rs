//! Order repository: transactional order creation and order queries.
//!
//! The two creation paths (direct pay-on-delivery and gateway-confirmed)
//! both write the order, its line items, and the stock decrements inside a
//! single transaction, so no partial order is ever visible to readers.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::warn;

use gilsenan_core::cart::CartItem;
use gilsenan_core::{OrderId, OrderItemId, OrderStatus, ProductId};

use super::RepositoryError;
use super::products::{decrement_stock, deplete_stock};
use crate::models::{Order, OrderItem, OrderWithItems};

/// Internal row type for order queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: i32,
    total: Decimal,
    customer_email: String,
    shipping_address: String,
    status: String,
    checkout_session_id: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::from_str(&row.status)
            .map_err(|e| RepositoryError::DataCorruption(format!("invalid status: {e}")))?;

        Ok(Self {
            id: OrderId::new(row.id),
            total: row.total,
            customer_email: row.customer_email,
            shipping_address: row.shipping_address,
            status,
            checkout_session_id: row.checkout_session_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Internal row type for order item queries.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i32,
    order_id: i32,
    product_id: Option<i32>,
    title: String,
    artist: String,
    quantity: i32,
    price: Decimal,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: OrderItemId::new(row.id),
            product_id: row.product_id.map(ProductId::new),
            title: row.title,
            artist: row.artist,
            quantity: row.quantity,
            price: row.price,
        }
    }
}

const ORDER_COLUMNS: &str = "id, total, customer_email, shipping_address, status, \
                             checkout_session_id, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, title, artist, quantity, price";

/// Result of a gateway-confirmed order creation.
#[derive(Debug)]
pub enum ConfirmedOrder {
    /// The order was created by this call; stock was decremented.
    Created(OrderWithItems),
    /// An order for this session already existed; nothing was written.
    AlreadyConfirmed(OrderWithItems),
}

impl ConfirmedOrder {
    /// The order, whichever way it was obtained.
    #[must_use]
    pub fn into_order(self) -> OrderWithItems {
        match self {
            Self::Created(order) | Self::AlreadyConfirmed(order) => order,
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a direct (pay-on-delivery) order.
    ///
    /// Runs in one transaction: the order row, one line per cart item with
    /// the title/artist/price snapshot re-read from the live catalog, and a
    /// strict stock decrement per line. Submitted line prices are checked
    /// against the catalog so a stale client cannot freeze an old price.
    ///
    /// # Errors
    ///
    /// - `RepositoryError::NotFound` if a line references a missing product
    /// - `RepositoryError::Conflict` if a submitted price no longer matches
    /// - `RepositoryError::InsufficientStock` if a line exceeds stock
    pub async fn create_direct(
        &self,
        customer_email: &str,
        shipping_address: &str,
        total: Decimal,
        items: &[CartItem],
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_row = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (total, customer_email, shipping_address, status)
             VALUES ($1, $2, $3, $4)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(total)
        .bind(customer_email)
        .bind(shipping_address)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await?;

        let order_id = order_row.id;
        let mut order_items = Vec::with_capacity(items.len());

        for line in items {
            // Re-read the authoritative snapshot from the catalog.
            let catalog = sqlx::query_as::<_, (String, String, Decimal)>(
                "SELECT title, artist, price FROM products WHERE id = $1",
            )
            .bind(line.id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

            let (title, artist, price) = catalog;
            if price != line.price {
                return Err(RepositoryError::Conflict(format!(
                    "price changed for product {}",
                    line.id
                )));
            }

            let quantity = i32::try_from(line.quantity).map_err(|_| {
                RepositoryError::Conflict(format!("quantity out of range for product {}", line.id))
            })?;

            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                "INSERT INTO order_items (order_id, product_id, title, artist, quantity, price)
                 VALUES ($1, $2, $3, $4, $5, $6)
                 RETURNING {ITEM_COLUMNS}"
            ))
            .bind(order_id)
            .bind(line.id)
            .bind(&title)
            .bind(&artist)
            .bind(quantity)
            .bind(price)
            .fetch_one(&mut *tx)
            .await?;

            decrement_stock(&mut tx, line.id, quantity).await?;
            order_items.push(OrderItem::from(item_row));
        }

        tx.commit().await?;

        Ok(OrderWithItems {
            order: Order::try_from(order_row)?,
            items: order_items,
        })
    }

    /// Create an order for a gateway-confirmed payment, exactly once per
    /// session.
    ///
    /// The unique constraint on `checkout_session_id` is the authority: if
    /// a concurrent confirmation of the same session wins the race, the
    /// resulting unique violation is translated into
    /// [`ConfirmedOrder::AlreadyConfirmed`] and the existing order is
    /// returned. Stock is depleted with clamping since the payment has
    /// already been captured; an oversell is logged, not failed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any write fails.
    pub async fn create_confirmed(
        &self,
        session_id: &str,
        customer_email: &str,
        shipping_address: &str,
        total: Decimal,
        items: &[CartItem],
    ) -> Result<ConfirmedOrder, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query_as::<_, OrderRow>(&format!(
            "INSERT INTO orders (total, customer_email, shipping_address, status, \
             checkout_session_id)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (checkout_session_id) DO NOTHING
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(total)
        .bind(customer_email)
        .bind(shipping_address)
        .bind(OrderStatus::Completed.as_str())
        .bind(session_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(order_row) = inserted else {
            // Lost the race (or a retry): return the existing order untouched.
            tx.rollback().await?;
            let existing = self
                .find_by_session(session_id)
                .await?
                .ok_or(RepositoryError::NotFound)?;
            return Ok(ConfirmedOrder::AlreadyConfirmed(existing));
        };

        let order_id = order_row.id;
        let mut order_items = Vec::with_capacity(items.len());

        for line in items {
            let quantity = i32::try_from(line.quantity).unwrap_or(i32::MAX);

            // The subselect leaves product_id NULL if the product was
            // deleted between checkout and confirmation; the snapshot
            // columns still record what was sold.
            let item_row = sqlx::query_as::<_, OrderItemRow>(&format!(
                "INSERT INTO order_items (order_id, product_id, title, artist, quantity, price)
                 VALUES ($1, (SELECT id FROM products WHERE id = $2), $3, $4, $5, $6)
                 RETURNING {ITEM_COLUMNS}"
            ))
            .bind(order_id)
            .bind(line.id)
            .bind(&line.title)
            .bind(&line.artist)
            .bind(quantity)
            .bind(line.price)
            .fetch_one(&mut *tx)
            .await?;

            match deplete_stock(&mut tx, line.id, quantity).await? {
                Some(0) => warn!(
                    product_id = %line.id,
                    quantity,
                    "stock depleted to zero by confirmed order"
                ),
                Some(_) => {}
                None => warn!(
                    product_id = %line.id,
                    "confirmed order references deleted product; no stock to decrement"
                ),
            }

            order_items.push(OrderItem::from(item_row));
        }

        tx.commit().await?;

        Ok(ConfirmedOrder::Created(OrderWithItems {
            order: Order::try_from(order_row)?,
            items: order_items,
        }))
    }

    /// List all orders with their items, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_with_items(&self) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let order_rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        let order_ids: Vec<i32> = order_rows.iter().map(|row| row.id).collect();
        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(&order_ids)
        .fetch_all(self.pool)
        .await?;

        let mut items_by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for row in item_rows {
            items_by_order
                .entry(row.order_id)
                .or_default()
                .push(OrderItem::from(row));
        }

        order_rows
            .into_iter()
            .map(|row| {
                let items = items_by_order.remove(&row.id).unwrap_or_default();
                Ok(OrderWithItems {
                    order: Order::try_from(row)?,
                    items,
                })
            })
            .collect()
    }

    /// Fetch one order with its items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.attach_items(row).await?)),
            None => Ok(None),
        }
    }

    /// Find the order created for a gateway session, if any.
    ///
    /// This is the idempotency lookup: one indexed equality query against
    /// the dedicated correlation column.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn find_by_session(
        &self,
        session_id: &str,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE checkout_session_id = $1"
        ))
        .bind(session_id)
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.attach_items(row).await?)),
            None => Ok(None),
        }
    }

    /// Update an order's status.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no order has this ID.
    pub async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "UPDATE orders SET status = $2, updated_at = now()
             WHERE id = $1
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from)
            .transpose()?
            .ok_or(RepositoryError::NotFound)
    }

    async fn attach_items(&self, row: OrderRow) -> Result<OrderWithItems, RepositoryError> {
        let item_rows = sqlx::query_as::<_, OrderItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(row.id)
        .fetch_all(self.pool)
        .await?;

        Ok(OrderWithItems {
            order: Order::try_from(row)?,
            items: item_rows.into_iter().map(OrderItem::from).collect(),
        })
    }
}
