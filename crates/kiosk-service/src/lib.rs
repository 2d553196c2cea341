//! # kiosk-service: Service Layer for Kiosk POS
//!
//! The workflows the presentation shell calls into. The shell supplies
//! validated primitive inputs (strings, numbers) and renders the returned
//! payloads; every business rule lives on this side of the boundary.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     kiosk-service (THIS CRATE)                          │
//! │                                                                         │
//! │   ┌───────────────┐ ┌─────────────┐ ┌─────────────┐ ┌─────────────┐   │
//! │   │CatalogService │ │SkuGenerator │ │ SaleService │ │ CashService │   │
//! │   │ category CRUD │ │ suggest_sku │ │ search      │ │ balance     │   │
//! │   │ product CRUD  │ │ (advisory)  │ │ commit_sale │ │ withdrawal  │   │
//! │   └───────┬───────┘ └──────┬──────┘ └──────┬──────┘ └──────┬──────┘   │
//! │           │                │               │               │           │
//! │           └────────────────┴───────┬───────┴───────────────┘           │
//! │                                    ▼                                    │
//! │                         kiosk-db repositories                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kiosk_db::DbConfig;
//! use kiosk_service::Pos;
//!
//! let pos = Pos::open(DbConfig::new("./kiosk_pos.db")).await?;
//!
//! let hits = pos.sales().search("cola").await?;
//! let receipt = pos.sales().commit_sale(&lines, method, "cashier").await?;
//! let balance = pos.cash().available_balance_today().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cash;
pub mod catalog;
pub mod error;
pub mod sale;
pub mod sku;

// =============================================================================
// Re-exports
// =============================================================================

pub use cash::CashService;
pub use catalog::CatalogService;
pub use error::{ServiceError, ServiceResult};
pub use sale::{SaleReceipt, SaleService};
pub use sku::SkuGenerator;

use kiosk_db::{Database, DbConfig};

// =============================================================================
// Facade
// =============================================================================

/// One handle bundling every service over a shared database.
///
/// The shell holds a single `Pos` for the lifetime of the process;
/// services are cheap clones over the same connection pool.
#[derive(Debug, Clone)]
pub struct Pos {
    catalog: CatalogService,
    sku: SkuGenerator,
    sales: SaleService,
    cash: CashService,
}

impl Pos {
    /// Wires the services over an existing database handle.
    pub fn new(db: &Database) -> Self {
        Pos {
            catalog: CatalogService::new(db),
            sku: SkuGenerator::new(db),
            sales: SaleService::new(db),
            cash: CashService::new(db),
        }
    }

    /// Opens (creating and migrating if needed) a database and wires the
    /// services over it.
    pub async fn open(config: DbConfig) -> ServiceResult<Self> {
        let db = Database::new(config).await?;
        Ok(Pos::new(&db))
    }

    /// Catalog administration: categories and products.
    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }

    /// Advisory SKU suggestions.
    pub fn sku(&self) -> &SkuGenerator {
        &self.sku
    }

    /// Checkout search and sale commits.
    pub fn sales(&self) -> &SaleService {
        &self.sales
    }

    /// Drawer balance and withdrawals.
    pub fn cash(&self) -> &CashService {
        &self.cash
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_core::{CartLine, NewCategory, NewProduct, PaymentMethod};

    /// End-to-end flow through the facade: catalog → suggestion → sale →
    /// drawer.
    #[tokio::test]
    async fn test_full_day_at_the_kiosk() {
        let pos = Pos::open(DbConfig::in_memory()).await.unwrap();

        // Catalog admin sets up a category and takes the suggested SKU
        let category_id = pos
            .catalog()
            .add_category(NewCategory {
                name: "Beverages".to_string(),
                prefix: "beb".to_string(),
                description: Some("Sodas and water".to_string()),
            })
            .await
            .unwrap();

        let sku = pos.sku().suggest_sku(&category_id).await.unwrap();
        assert_eq!(sku, "BEB001");

        let product_id = pos
            .catalog()
            .add_product(NewProduct {
                sku,
                name: "Coca-Cola 600ml".to_string(),
                description: None,
                quantity: 10,
                price_cents: 2500,
                min_stock: 3,
                category_label: "BEVERAGES".to_string(),
            })
            .await
            .unwrap();

        // Cashier finds it and rings up 4
        let hits = pos.sales().search("cola").await.unwrap();
        assert_eq!(hits.len(), 1);

        let line = CartLine {
            product_id: product_id.clone(),
            sku: hits[0].sku.clone(),
            name: hits[0].name.clone(),
            quantity: 4,
            unit_price_cents: hits[0].price_cents,
        };
        let receipt = pos
            .sales()
            .commit_sale(&[line], PaymentMethod::Cash, "cashier")
            .await
            .unwrap();
        assert_eq!(receipt.total_cents, 10000);

        // Stock went down, drawer went up
        let product = pos.catalog().get_product(&product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 6);
        assert_eq!(
            pos.cash().available_balance_today().await.unwrap().cents(),
            10000
        );

        // Manager takes out $60.00
        pos.cash()
            .record_withdrawal(6000, "bank run", "manager")
            .await
            .unwrap();
        assert_eq!(
            pos.cash().available_balance_today().await.unwrap().cents(),
            4000
        );
    }
}
