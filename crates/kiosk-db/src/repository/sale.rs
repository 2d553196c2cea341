//! # Sale Repository
//!
//! Atomic sale commit and day-level sale queries.
//!
//! ## Commit Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Sale Commit (one transaction)                       │
//! │                                                                         │
//! │  Proposed line items                                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  1. VALIDATE: re-read live quantity per product                        │
//! │     └── missing row or quantity < requested → rollback                 │
//! │                                                                         │
//! │  2. INSERT sale row + line-item snapshot rows                          │
//! │                                                                         │
//! │  3. DECREMENT per line:                                                │
//! │     UPDATE products SET quantity = quantity - N                        │
//! │     WHERE id = ? AND quantity >= N                                     │
//! │     └── rows_affected = 0 → rollback (validation raced a writer)       │
//! │                                                                         │
//! │  4. COMMIT                                                             │
//! │                                                                         │
//! │  Any early exit drops the transaction → SQLite rolls back → zero       │
//! │  rows persisted, zero quantity changes.                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decrement guard is evaluated by the store itself, never as a
//! caller-side read-modify-write. Stock cannot go negative through this
//! path even if concurrent access is introduced later.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use kiosk_core::{CartLine, PaymentMethod, Sale, SaleLineItem};

/// Result of an atomic commit attempt.
///
/// Stock shortfalls are a business outcome, not a storage failure, so they
/// get their own variant instead of an error: the caller turns it into the
/// user-facing rejection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitOutcome {
    /// Sale and line items persisted, stock decremented.
    Committed { sale_id: String, total_cents: i64 },
    /// A line item failed validation or the guarded decrement; nothing was
    /// persisted.
    InsufficientStock { product_name: String },
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Commits a sale in one all-or-nothing transaction.
    ///
    /// The caller has already rejected empty carts and malformed lines;
    /// this method owns the stock invariant.
    ///
    /// ## Why validate inside the transaction?
    /// The interval between "added to cart" and "pay" is unbounded in a
    /// manual UI flow. Quantities captured at cart-add time are stale by
    /// definition, so live stock is re-read here, and the decrement guard
    /// re-applies the same check at write time to close the remaining
    /// validate/commit window.
    pub async fn commit_sale(
        &self,
        lines: &[CartLine],
        payment_method: PaymentMethod,
        operator: &str,
    ) -> DbResult<CommitOutcome> {
        let mut tx = self.pool.begin().await?;

        // Validation pass: live quantity per referenced product.
        for line in lines {
            let row: Option<(String, i64)> =
                sqlx::query_as("SELECT name, quantity FROM products WHERE id = ?1")
                    .bind(&line.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            match row {
                None => {
                    debug!(product_id = %line.product_id, "Sale rejected: product missing");
                    return Ok(CommitOutcome::InsufficientStock {
                        product_name: line.name.clone(),
                    });
                }
                Some((name, quantity)) if quantity < line.quantity => {
                    debug!(
                        product_id = %line.product_id,
                        available = quantity,
                        requested = line.quantity,
                        "Sale rejected: insufficient stock"
                    );
                    return Ok(CommitOutcome::InsufficientStock { product_name: name });
                }
                Some(_) => {}
            }
        }

        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();
        let total_cents: i64 = lines.iter().map(CartLine::subtotal_cents).sum();

        sqlx::query(
            r#"
            INSERT INTO sales (id, total_cents, payment_method, created_at, operator)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&sale_id)
        .bind(total_cents)
        .bind(payment_method)
        .bind(now)
        .bind(operator)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                r#"
                INSERT INTO sale_line_items (
                    id, sale_id, product_id, sku, product_name,
                    quantity, unit_price_cents, subtotal_cents
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(Uuid::new_v4().to_string())
            .bind(&sale_id)
            .bind(&line.product_id)
            .bind(&line.sku)
            .bind(&line.name)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.subtotal_cents())
            .execute(&mut *tx)
            .await?;
        }

        // Guarded decrement, evaluated by the store itself.
        for line in lines {
            let result = sqlx::query(
                r#"
                UPDATE products
                SET quantity = quantity - ?2, updated_at = ?3
                WHERE id = ?1 AND quantity >= ?2
                "#,
            )
            .bind(&line.product_id)
            .bind(line.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                debug!(product_id = %line.product_id, "Sale rejected: decrement guard tripped");
                return Ok(CommitOutcome::InsufficientStock {
                    product_name: line.name.clone(),
                });
            }
        }

        tx.commit().await?;

        info!(sale_id = %sale_id, total_cents, items = lines.len(), "Sale committed");

        Ok(CommitOutcome::Committed {
            sale_id,
            total_cents,
        })
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_cents, payment_method, created_at, operator
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets the line items of a sale, in insertion order.
    pub async fn line_items(&self, sale_id: &str) -> DbResult<Vec<SaleLineItem>> {
        let items = sqlx::query_as::<_, SaleLineItem>(
            r#"
            SELECT id, sale_id, product_id, sku, product_name,
                   quantity, unit_price_cents, subtotal_cents
            FROM sale_line_items
            WHERE sale_id = ?1
            ORDER BY rowid
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Sales recorded on the given calendar day, most recent first.
    pub async fn sales_for_day(&self, day: NaiveDate) -> DbResult<Vec<Sale>> {
        let day = day.format("%Y-%m-%d").to_string();

        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, total_cents, payment_method, created_at, operator
            FROM sales
            WHERE DATE(created_at) = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(sales)
    }

    /// Sum of sale totals for the given calendar day (0 for quiet days).
    pub async fn total_for_day(&self, day: NaiveDate) -> DbResult<i64> {
        let day = day.format("%Y-%m-%d").to_string();

        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_cents), 0) FROM sales WHERE DATE(created_at) = ?1",
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use kiosk_core::Product;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn seed_product(db: &Database, sku: &str, name: &str, quantity: i64) -> Product {
        let now = Utc::now();
        let p = Product {
            id: generate_product_id(),
            sku: sku.to_string(),
            name: name.to_string(),
            description: None,
            quantity,
            price_cents: 2500,
            min_stock: 5,
            category_label: "BEVERAGES".to_string(),
            created_at: now,
            updated_at: now,
        };
        db.products().insert(&p).await.unwrap();
        p
    }

    fn line(product: &Product, quantity: i64) -> CartLine {
        CartLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            quantity,
            unit_price_cents: product.price_cents,
        }
    }

    #[tokio::test]
    async fn test_commit_decrements_stock_and_snapshots_lines() {
        let db = test_db().await;
        let coke = seed_product(&db, "BEB001", "Coca-Cola 600ml", 50).await;
        let sprite = seed_product(&db, "BEB002", "Sprite 600ml", 40).await;

        let lines = vec![line(&coke, 3), line(&sprite, 2)];
        let outcome = db
            .sales()
            .commit_sale(&lines, PaymentMethod::Cash, "cashier")
            .await
            .unwrap();

        let sale_id = match outcome {
            CommitOutcome::Committed {
                sale_id,
                total_cents,
            } => {
                assert_eq!(total_cents, 5 * 2500);
                sale_id
            }
            other => panic!("expected committed sale, got {other:?}"),
        };

        // Stock decremented per line
        assert_eq!(
            db.products().get_by_id(&coke.id).await.unwrap().unwrap().quantity,
            47
        );
        assert_eq!(
            db.products()
                .get_by_id(&sprite.id)
                .await
                .unwrap()
                .unwrap()
                .quantity,
            38
        );

        // Line items reconcile with the decrements
        let items = db.sales().line_items(&sale_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "BEB001");
        assert_eq!(items[0].quantity, 3);
        assert_eq!(items[0].subtotal_cents, 7500);
        assert_eq!(items[1].sku, "BEB002");

        let sale = db.sales().get_by_id(&sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 12500);
        assert_eq!(sale.payment_method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_commit_is_atomic_on_shortfall() {
        let db = test_db().await;
        let coke = seed_product(&db, "BEB001", "Coca-Cola 600ml", 50).await;
        let water = seed_product(&db, "BEB003", "Agua 500ml", 1).await;

        // Second line over-requests: the whole sale must be rejected
        let lines = vec![line(&coke, 3), line(&water, 5)];
        let outcome = db
            .sales()
            .commit_sale(&lines, PaymentMethod::Cash, "cashier")
            .await
            .unwrap();

        match outcome {
            CommitOutcome::InsufficientStock { product_name } => {
                assert_eq!(product_name, "Agua 500ml");
            }
            other => panic!("expected insufficient stock, got {other:?}"),
        }

        // Zero rows persisted, zero quantity changes
        assert_eq!(
            db.products().get_by_id(&coke.id).await.unwrap().unwrap().quantity,
            50
        );
        assert_eq!(
            db.products().get_by_id(&water.id).await.unwrap().unwrap().quantity,
            1
        );
        let today = Utc::now().date_naive();
        assert!(db.sales().sales_for_day(today).await.unwrap().is_empty());
        assert_eq!(db.sales().total_for_day(today).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_commit_rejects_missing_product() {
        let db = test_db().await;

        let ghost = CartLine {
            product_id: "deleted-while-in-cart".to_string(),
            sku: "BEB009".to_string(),
            name: "Discontinued Soda".to_string(),
            quantity: 1,
            unit_price_cents: 2500,
        };

        let outcome = db
            .sales()
            .commit_sale(&[ghost], PaymentMethod::Card, "cashier")
            .await
            .unwrap();

        match outcome {
            CommitOutcome::InsufficientStock { product_name } => {
                assert_eq!(product_name, "Discontinued Soda");
            }
            other => panic!("expected insufficient stock, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_stock_never_goes_negative_across_sequential_sales() {
        let db = test_db().await;
        let water = seed_product(&db, "BEB003", "Agua 500ml", 5).await;

        // 5 in stock: 3 then 2 succeed, the third sale finds none left
        for (qty, should_commit) in [(3, true), (2, true), (1, false)] {
            let outcome = db
                .sales()
                .commit_sale(&[line(&water, qty)], PaymentMethod::Cash, "cashier")
                .await
                .unwrap();
            match (should_commit, outcome) {
                (true, CommitOutcome::Committed { .. }) => {}
                (false, CommitOutcome::InsufficientStock { .. }) => {}
                (expected, got) => panic!("expected commit={expected}, got {got:?}"),
            }
        }

        let remaining = db
            .products()
            .get_by_id(&water.id)
            .await
            .unwrap()
            .unwrap()
            .quantity;
        assert_eq!(remaining, 0);
    }

    #[tokio::test]
    async fn test_exact_stock_sale_commits_to_zero() {
        let db = test_db().await;
        let water = seed_product(&db, "BEB003", "Agua 500ml", 4).await;

        let outcome = db
            .sales()
            .commit_sale(&[line(&water, 4)], PaymentMethod::Cash, "cashier")
            .await
            .unwrap();
        assert!(matches!(outcome, CommitOutcome::Committed { .. }));

        assert_eq!(
            db.products().get_by_id(&water.id).await.unwrap().unwrap().quantity,
            0
        );
    }

    #[tokio::test]
    async fn test_day_queries_order_most_recent_first() {
        let db = test_db().await;
        let coke = seed_product(&db, "BEB001", "Coca-Cola 600ml", 50).await;

        for _ in 0..3 {
            let outcome = db
                .sales()
                .commit_sale(&[line(&coke, 1)], PaymentMethod::Cash, "cashier")
                .await
                .unwrap();
            assert!(matches!(outcome, CommitOutcome::Committed { .. }));
        }

        let today = Utc::now().date_naive();
        let sales = db.sales().sales_for_day(today).await.unwrap();
        assert_eq!(sales.len(), 3);
        assert!(sales.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        assert_eq!(db.sales().total_for_day(today).await.unwrap(), 3 * 2500);
    }
}
