//! # Sale Service
//!
//! Checkout search and the sale transaction coordinator.
//!
//! ## Sale State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Sale attempt state machine                           │
//! │                                                                         │
//! │   Proposed ──► Validated ──► Committed                                 │
//! │      │             │                                                    │
//! │      │             └──────────► Rejected (InsufficientStock)           │
//! │      │                                                                  │
//! │      └────────────────────────► Rejected (EmptyCart / bad quantity)    │
//! │                                                                         │
//! │  Proposed:   non-empty cart lines + payment method token               │
//! │  Validated:  every line re-checked against LIVE stock inside the       │
//! │              commit transaction (cart-time quantities are stale by     │
//! │              definition)                                               │
//! │  Committed:  sale + line snapshots persisted, stock decremented,       │
//! │              receipt returned                                          │
//! │  Rejected:   zero rows persisted, zero quantity changes                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This service owns the entire write path for sales and the only
//! downward mutation of product quantity in the system.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ServiceError, ServiceResult};
use kiosk_core::validation::{term_is_searchable, validate_cart_size, validate_line_quantity};
use kiosk_core::{CartLine, CoreError, PaymentMethod, Sale, SaleLineItem, SearchHit};
use kiosk_core::SEARCH_RESULT_LIMIT;
use kiosk_db::{CommitOutcome, Database, ProductRepository, SaleRepository};

/// Confirmation payload returned to the shell after a committed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale_id: String,
    pub total_cents: i64,
    pub item_count: usize,
    /// Human-readable confirmation, surfaced verbatim by the shell.
    pub message: String,
}

/// Service for checkout search and sale commits.
#[derive(Debug, Clone)]
pub struct SaleService {
    products: ProductRepository,
    sales: SaleRepository,
}

impl SaleService {
    /// Creates a new SaleService over the given database.
    pub fn new(db: &Database) -> Self {
        SaleService {
            products: db.products(),
            sales: db.sales(),
        }
    }

    /// Ranked checkout search.
    ///
    /// Terms shorter than 2 characters return an empty list (the shell
    /// searches per keystroke; short terms are a no-op, not an error).
    /// At most 10 hits; exact SKU matches rank first, then name matches,
    /// then category-only matches, ties broken by name.
    pub async fn search(&self, term: &str) -> ServiceResult<Vec<SearchHit>> {
        if !term_is_searchable(term) {
            debug!(term = %term, "Search term below minimum length");
            return Ok(Vec::new());
        }

        Ok(self
            .products
            .search_for_sale(term, SEARCH_RESULT_LIMIT)
            .await?)
    }

    /// Commits a sale: Proposed → Validated → Committed, or Rejected.
    ///
    /// ## Rejections
    /// - `EmptyCart` before any lookups occur
    /// - Per-line quantity outside 1..=999
    /// - `InsufficientStock{product_name}` when any line over-requests
    ///   live stock (checked inside the storage transaction); the whole
    ///   sale fails and nothing persists
    pub async fn commit_sale(
        &self,
        lines: &[CartLine],
        payment_method: PaymentMethod,
        operator: &str,
    ) -> ServiceResult<SaleReceipt> {
        if lines.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        validate_cart_size(lines.len())?;
        for line in lines {
            validate_line_quantity(line.quantity)?;
        }

        match self
            .sales
            .commit_sale(lines, payment_method, operator)
            .await?
        {
            CommitOutcome::Committed {
                sale_id,
                total_cents,
            } => {
                info!(sale_id = %sale_id, total_cents, "Sale completed");
                Ok(SaleReceipt {
                    message: format!("Sale {sale_id} completed"),
                    sale_id,
                    total_cents,
                    item_count: lines.len(),
                })
            }
            CommitOutcome::InsufficientStock { product_name } => {
                Err(CoreError::InsufficientStock { product_name }.into())
            }
        }
    }

    /// Gets a committed sale by id.
    pub async fn get_sale(&self, id: &str) -> ServiceResult<Option<Sale>> {
        Ok(self.sales.get_by_id(id).await?)
    }

    /// Gets a sale's line items in the order they were rung up.
    pub async fn line_items(&self, sale_id: &str) -> ServiceResult<Vec<SaleLineItem>> {
        Ok(self.sales.line_items(sale_id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogService;
    use kiosk_core::{NewProduct, ValidationError};
    use kiosk_db::DbConfig;

    async fn setup() -> (CatalogService, SaleService) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (CatalogService::new(&db), SaleService::new(&db))
    }

    async fn seed(catalog: &CatalogService, sku: &str, name: &str, quantity: i64) -> CartLine {
        let id = catalog
            .add_product(NewProduct {
                sku: sku.to_string(),
                name: name.to_string(),
                description: None,
                quantity,
                price_cents: 2500,
                min_stock: 5,
                category_label: "BEVERAGES".to_string(),
            })
            .await
            .unwrap();

        CartLine {
            product_id: id,
            sku: sku.to_string(),
            name: name.to_string(),
            quantity: 1,
            unit_price_cents: 2500,
        }
    }

    #[tokio::test]
    async fn test_empty_cart_rejected_before_lookups() {
        let (_, sales) = setup().await;

        let err = sales
            .commit_sale(&[], PaymentMethod::Cash, "cashier")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::EmptyCart)));
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[tokio::test]
    async fn test_non_positive_line_quantity_rejected() {
        let (catalog, sales) = setup().await;
        let mut line = seed(&catalog, "BEB001", "Coca-Cola 600ml", 50).await;
        line.quantity = 0;

        let err = sales
            .commit_sale(&[line], PaymentMethod::Cash, "cashier")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::MustBePositive { .. })
        ));
    }

    #[tokio::test]
    async fn test_commit_returns_receipt() {
        let (catalog, sales) = setup().await;
        let mut cola = seed(&catalog, "BEB001", "Coca-Cola 600ml", 50).await;
        cola.quantity = 3;
        let sprite = seed(&catalog, "BEB002", "Sprite 600ml", 40).await;

        let receipt = sales
            .commit_sale(&[cola, sprite], PaymentMethod::Cash, "cashier")
            .await
            .unwrap();

        assert_eq!(receipt.total_cents, 4 * 2500);
        assert_eq!(receipt.item_count, 2);
        assert!(receipt.message.contains(&receipt.sale_id));

        let sale = sales.get_sale(&receipt.sale_id).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 10000);

        let items = sales.line_items(&receipt.sale_id).await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].sku, "BEB001");
    }

    #[tokio::test]
    async fn test_insufficient_stock_names_the_product() {
        let (catalog, sales) = setup().await;
        let cola = seed(&catalog, "BEB001", "Coca-Cola 600ml", 50).await;
        let mut water = seed(&catalog, "BEB003", "Agua 500ml", 2).await;
        water.quantity = 5;

        let err = sales
            .commit_sale(&[cola.clone(), water], PaymentMethod::Cash, "cashier")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Insufficient stock for Agua 500ml");

        // Atomicity: the passing line wasn't applied either
        let p = catalog.get_product(&cola.product_id).await.unwrap().unwrap();
        assert_eq!(p.quantity, 50);
    }

    #[tokio::test]
    async fn test_stale_cart_price_is_honored_not_live_price() {
        let (catalog, sales) = setup().await;
        let line = seed(&catalog, "BEB001", "Coca-Cola 600ml", 50).await;

        // Price raised after the item was added to the cart
        let mut p = catalog.get_product(&line.product_id).await.unwrap().unwrap();
        p.price_cents = 9900;
        assert!(catalog.update_product(&p).await.unwrap());

        let receipt = sales
            .commit_sale(&[line], PaymentMethod::Cash, "cashier")
            .await
            .unwrap();

        // The captured snapshot price is what the customer was quoted
        assert_eq!(receipt.total_cents, 2500);
        let items = sales.line_items(&receipt.sale_id).await.unwrap();
        assert_eq!(items[0].unit_price_cents, 2500);
    }

    #[tokio::test]
    async fn test_search_short_term_is_noop() {
        let (catalog, sales) = setup().await;
        seed(&catalog, "BEB001", "Coca-Cola 600ml", 50).await;

        assert!(sales.search("").await.unwrap().is_empty());
        assert!(sales.search("b").await.unwrap().is_empty());
        assert_eq!(sales.search("be").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_ranks_exact_sku_first() {
        let (catalog, sales) = setup().await;
        seed(&catalog, "BEB001", "Coca-Cola", 50).await;
        seed(&catalog, "BEB002", "Cola Light", 40).await;

        let hits = sales.search("beb001").await.unwrap();
        assert_eq!(hits[0].sku, "BEB001");

        let hits = sales.search("cola").await.unwrap();
        assert_eq!(hits[0].name, "Coca-Cola");
        assert_eq!(hits[1].name, "Cola Light");
    }

    #[test]
    fn test_receipt_serializes_camel_case_for_the_shell() {
        let receipt = SaleReceipt {
            sale_id: "abc".to_string(),
            total_cents: 10000,
            item_count: 2,
            message: "Sale abc completed".to_string(),
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["saleId"], "abc");
        assert_eq!(json["totalCents"], 10000);
        assert_eq!(json["itemCount"], 2);
    }
}
