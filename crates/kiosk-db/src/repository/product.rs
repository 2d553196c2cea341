//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Key Operations
//! - Ranked checkout search
//! - CRUD operations
//! - Prefix counting for SKU suggestions
//!
//! ## Ranked Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Checkout Search Ranks                            │
//! │                                                                         │
//! │  Cashier types: "beb001"                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Substring match across: name, sku, category_label (all NOCASE)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │ rank 0: exact SKU match        BEB001   │ ← always first            │
//! │  │ rank 1: name substring match            │                           │
//! │  │ rank 2: category / anything else        │                           │
//! │  │ ties broken by name, LIMIT 10           │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │                                                                         │
//! │  A cashier typing an exact SKU sees it first no matter how many        │
//! │  name matches exist.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kiosk_core::{Product, SearchHit};

/// Ranked search across name, SKU and category label.
const SEARCH_SQL: &str = r#"
SELECT id, sku, name, price_cents, quantity, category_label
FROM products
WHERE LOWER(name) LIKE LOWER(?1)
   OR LOWER(sku) LIKE LOWER(?1)
   OR LOWER(category_label) LIKE LOWER(?1)
ORDER BY
    CASE
        WHEN LOWER(sku) = LOWER(?2) THEN 0
        WHEN LOWER(name) LIKE LOWER(?1) THEN 1
        ELSE 2
    END,
    name
LIMIT ?3
"#;

/// Degraded search for schema revisions without a category column.
const SEARCH_SQL_NO_CATEGORY: &str = r#"
SELECT id, sku, name, price_cents, quantity, '' AS category_label
FROM products
WHERE LOWER(name) LIKE LOWER(?1)
   OR LOWER(sku) LIKE LOWER(?1)
ORDER BY
    CASE
        WHEN LOWER(sku) = LOWER(?2) THEN 0
        WHEN LOWER(name) LIKE LOWER(?1) THEN 1
        ELSE 2
    END,
    name
LIMIT ?3
"#;

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Ranked checkout search
/// let hits = repo.search_for_sale("cola", 10).await?;
///
/// // Get by ID
/// let product = repo.get_by_id("uuid-here").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Ranked substring search for the checkout screen.
    ///
    /// ## Ordering
    /// 1. Exact (case-insensitive) SKU match
    /// 2. Name substring match
    /// 3. Everything else (matched on category label only)
    /// Ties broken by name; at most `limit` rows.
    ///
    /// ## Schema Degradation
    /// Against an older database file whose products table predates the
    /// category column, the query retries without it and hits carry an
    /// empty `category_label`.
    ///
    /// The caller is responsible for the minimum-term-length rule; an
    /// empty pattern here would match every row.
    pub async fn search_for_sale(&self, term: &str, limit: u32) -> DbResult<Vec<SearchHit>> {
        let term = term.trim();
        let pattern = format!("%{term}%");

        debug!(term = %term, limit = %limit, "Searching products");

        let full = sqlx::query_as::<_, SearchHit>(SEARCH_SQL)
            .bind(&pattern)
            .bind(term)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await;

        let hits = match full {
            Ok(hits) => hits,
            Err(sqlx::Error::Database(db_err))
                if db_err.message().contains("no such column: category_label") =>
            {
                sqlx::query_as::<_, SearchHit>(SEARCH_SQL_NO_CATEGORY)
                    .bind(&pattern)
                    .bind(term)
                    .bind(limit as i64)
                    .fetch_all(&self.pool)
                    .await?
            }
            Err(err) => return Err(err.into()),
        };

        debug!(count = hits.len(), "Search returned products");
        Ok(hits)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, description, quantity, price_cents,
                   min_stock, category_label, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by its SKU (case-insensitive via column collation).
    pub async fn get_by_sku(&self, sku: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, description, quantity, price_cents,
                   min_stock, category_label, created_at, updated_at
            FROM products
            WHERE sku = ?1
            "#,
        )
        .bind(sku)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, sku, name, description, quantity, price_cents,
                   min_stock, category_label, created_at, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - SKU already exists. This is the
    ///   correctness boundary for the SKU suggest/insert race: two inserts
    ///   computed from the same prefix count collide here, and the loser
    ///   is rejected rather than silently overwritten.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(sku = %product.sku, "Inserting product");

        sqlx::query(
            r#"
            INSERT INTO products (
                id, sku, name, description, quantity, price_cents,
                min_stock, category_label, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(&product.id)
        .bind(&product.sku)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.price_cents)
        .bind(product.min_stock)
        .bind(&product.category_label)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product (catalog edit path).
    ///
    /// Manual quantity corrections go through here; the sale path is the
    /// only other writer of `quantity` and only ever decrements.
    ///
    /// ## Returns
    /// `true` when a row was updated, `false` when the id is unknown.
    pub async fn update(&self, product: &Product) -> DbResult<bool> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE products SET
                name = ?2,
                description = ?3,
                quantity = ?4,
                price_cents = ?5,
                min_stock = ?6,
                category_label = ?7,
                updated_at = ?8
            WHERE id = ?1
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.quantity)
        .bind(product.price_cents)
        .bind(product.min_stock)
        .bind(&product.category_label)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hard-deletes a product.
    ///
    /// The catalog keeps no history for removed products; committed sale
    /// line items already carry their own snapshots.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting product");

        let result = sqlx::query("DELETE FROM products WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts products whose SKU starts with the given prefix
    /// (case-insensitive).
    ///
    /// Used by the SKU generator: an O(n) scan instead of a per-category
    /// sequence counter. Catalogs are small and suggestions are infrequent
    /// (one per product-creation dialog).
    pub async fn count_with_prefix(&self, prefix: &str) -> DbResult<i64> {
        let pattern = format!("{prefix}%");

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE sku LIKE ?1")
            .bind(pattern)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts products carrying the given category label.
    ///
    /// Zero matches is a normal answer, not an error.
    pub async fn count_in_category(&self, category_name: &str) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE category_label = ?1 COLLATE NOCASE",
        )
        .bind(category_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Counts all products.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
