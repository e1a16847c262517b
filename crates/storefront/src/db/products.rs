//! Product repository for catalog database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use gilsenan_core::ProductId;

use super::RepositoryError;
use crate::models::{NewProduct, Product};

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    artist: String,
    description: Option<String>,
    price: Decimal,
    category: String,
    stock: i32,
    featured: bool,
    image_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::new(row.id),
            title: row.title,
            artist: row.artist,
            description: row.description,
            price: row.price,
            category: row.category,
            stock: row.stock,
            featured: row.featured,
            image_url: row.image_url,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, title, artist, description, price, category, stock, \
                               featured, image_url, created_at, updated_at";

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    /// Create a new product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, input: &NewProduct) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "INSERT INTO products (title, artist, description, price, category, stock, \
             featured, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(&input.title)
        .bind(&input.artist)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.category)
        .bind(input.stock)
        .bind(input.featured)
        .bind(&input.image_url)
        .fetch_one(self.pool)
        .await?;

        Ok(Product::from(row))
    }

    /// Replace a product's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub async fn update(
        &self,
        id: ProductId,
        input: &NewProduct,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "UPDATE products
             SET title = $2, artist = $3, description = $4, price = $5, category = $6,
                 stock = $7, featured = $8, image_url = $9, updated_at = now()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(&input.title)
        .bind(&input.artist)
        .bind(&input.description)
        .bind(input.price)
        .bind(&input.category)
        .bind(input.stock)
        .bind(input.featured)
        .bind(&input.image_url)
        .fetch_optional(self.pool)
        .await?;

        row.map(Product::from).ok_or(RepositoryError::NotFound)
    }

    /// Delete a product.
    ///
    /// Historical order lines referencing it keep their snapshots; their
    /// `product_id` becomes NULL via the foreign key's ON DELETE SET NULL.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    pub async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

// =============================================================================
// Stock primitives
// =============================================================================
//
// Both are single-statement atomic updates so that concurrent orders against
// the same product never read-modify-write a stale stock value. They take a
// connection rather than the pool so order creation can run them inside its
// transaction.

/// Decrement stock, rejecting the decrement if it would go negative.
///
/// Used by the direct order path, where the order can still be refused.
///
/// # Errors
///
/// Returns `RepositoryError::InsufficientStock` if fewer than `quantity`
/// copies remain, or `RepositoryError::NotFound` if the product is gone.
pub async fn decrement_stock(
    conn: &mut PgConnection,
    id: ProductId,
    quantity: i32,
) -> Result<(), RepositoryError> {
    let updated = sqlx::query_scalar::<_, i32>(
        "UPDATE products
         SET stock = stock - $2, updated_at = now()
         WHERE id = $1 AND stock >= $2
         RETURNING stock",
    )
    .bind(id)
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await?;

    if updated.is_some() {
        return Ok(());
    }

    // Distinguish "not enough stock" from "no such product".
    let exists = sqlx::query_scalar::<_, i32>("SELECT 1 FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match exists {
        Some(_) => Err(RepositoryError::InsufficientStock(id)),
        None => Err(RepositoryError::NotFound),
    }
}

/// Decrement stock, clamping at zero.
///
/// Used after a confirmed payment: the money has already been captured, so
/// an oversell is logged by the caller rather than failing the order. A
/// product deleted since checkout simply matches no row.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the update fails.
pub async fn deplete_stock(
    conn: &mut PgConnection,
    id: ProductId,
    quantity: i32,
) -> Result<Option<i32>, RepositoryError> {
    let remaining = sqlx::query_scalar::<_, i32>(
        "UPDATE products
         SET stock = GREATEST(stock - $2, 0), updated_at = now()
         WHERE id = $1
         RETURNING stock",
    )
    .bind(id)
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(remaining)
}
