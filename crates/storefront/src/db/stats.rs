//! Dashboard aggregate queries.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use gilsenan_core::OrderId;

use super::RepositoryError;
use crate::models::{DashboardStats, RecentOrder};

/// Products with stock below this count show up in the low-stock number.
const LOW_STOCK_THRESHOLD: i32 = 5;

/// How many orders the dashboard's recent-orders list shows.
const RECENT_ORDERS_LIMIT: i64 = 5;

#[derive(Debug, sqlx::FromRow)]
struct RecentOrderRow {
    id: i32,
    customer_email: String,
    total: Decimal,
    created_at: DateTime<Utc>,
}

/// Compute the admin dashboard aggregates.
///
/// Revenue only counts completed and shipped orders; pending pay-on-delivery
/// orders are not realized yet.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if any query fails.
pub async fn dashboard_stats(pool: &PgPool) -> Result<DashboardStats, RepositoryError> {
    let total_products = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    let orders_today = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM orders
         WHERE created_at >= CURRENT_DATE
           AND created_at < CURRENT_DATE + INTERVAL '1 day'",
    )
    .fetch_one(pool)
    .await?;

    let total_revenue = sqlx::query_scalar::<_, Decimal>(
        "SELECT COALESCE(SUM(total), 0) FROM orders WHERE status IN ('completed', 'shipped')",
    )
    .fetch_one(pool)
    .await?;

    let featured_items =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE featured")
            .fetch_one(pool)
            .await?;

    let low_stock_items =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE stock < $1")
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(pool)
            .await?;

    let recent_rows = sqlx::query_as::<_, RecentOrderRow>(
        "SELECT id, customer_email, total, created_at FROM orders
         ORDER BY created_at DESC
         LIMIT $1",
    )
    .bind(RECENT_ORDERS_LIMIT)
    .fetch_all(pool)
    .await?;

    let recent_orders = recent_rows
        .into_iter()
        .map(|row| RecentOrder {
            id: OrderId::new(row.id),
            customer_email: row.customer_email,
            total: row.total,
            created_at: row.created_at,
        })
        .collect();

    Ok(DashboardStats {
        total_products,
        orders_today,
        total_revenue,
        featured_items,
        low_stock_items,
        recent_orders,
    })
}
