//! # SKU Generator
//!
//! Advisory SKU suggestions derived from category prefixes.
//!
//! ## How Suggestion Works
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        suggest_sku flow                                 │
//! │                                                                         │
//! │  Product-creation dialog opens with category "BEVERAGES" (prefix BEB)  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  COUNT products WHERE sku LIKE 'BEB%'   → 3                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Suggestion: "BEB" + zero-padded(3 + 1) → "BEB004"                     │
//! │                                                                         │
//! │  The suggestion is ADVISORY: nothing is reserved. If two dialogs       │
//! │  compute the same suggestion, the second insert loses to the SKU       │
//! │  unique constraint and the user retries with a fresh suggestion.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Counting is an O(n) scan per suggestion instead of a per-category
//! sequence counter. Catalogs are small and a suggestion happens once per
//! dialog open, so the scan is cheaper than keeping a counter consistent.

use crate::error::{ServiceError, ServiceResult};
use kiosk_db::{CategoryRepository, Database, ProductRepository};

/// Generates advisory SKUs from category prefixes.
#[derive(Debug, Clone)]
pub struct SkuGenerator {
    categories: CategoryRepository,
    products: ProductRepository,
}

impl SkuGenerator {
    /// Creates a new SkuGenerator over the given database.
    pub fn new(db: &Database) -> Self {
        SkuGenerator {
            categories: db.categories(),
            products: db.products(),
        }
    }

    /// Suggests the next SKU for a category.
    ///
    /// Format: `<PREFIX><NNN>` with the number zero-padded to 3 digits
    /// ("BEB" + 4 → "BEB004"). Counts past 999 simply widen the number.
    ///
    /// ## Errors
    /// `NotFound` when the category id is unknown.
    pub async fn suggest_sku(&self, category_id: &str) -> ServiceResult<String> {
        let category = self
            .categories
            .get_by_id(category_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound {
                entity: "Category",
                id: category_id.to_string(),
            })?;

        let count = self.products.count_with_prefix(&category.prefix).await?;

        Ok(format!("{}{:03}", category.prefix, count + 1))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogService;
    use kiosk_core::{NewCategory, NewProduct};
    use kiosk_db::DbConfig;

    async fn setup() -> (CatalogService, SkuGenerator) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        (CatalogService::new(&db), SkuGenerator::new(&db))
    }

    fn new_product(sku: &str) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: format!("Product {sku}"),
            description: None,
            quantity: 10,
            price_cents: 2500,
            min_stock: 5,
            category_label: "BEVERAGES".to_string(),
        }
    }

    async fn beverage_category(catalog: &CatalogService) -> String {
        catalog
            .add_category(NewCategory {
                name: "BEVERAGES".to_string(),
                prefix: "BEB".to_string(),
                description: None,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_first_suggestion_is_001() {
        let (catalog, sku) = setup().await;
        let category_id = beverage_category(&catalog).await;

        assert_eq!(sku.suggest_sku(&category_id).await.unwrap(), "BEB001");
    }

    #[tokio::test]
    async fn test_suggestion_counts_existing_prefix_holders() {
        let (catalog, sku) = setup().await;
        let category_id = beverage_category(&catalog).await;

        for n in 1..=3 {
            catalog
                .add_product(new_product(&format!("BEB{n:03}")))
                .await
                .unwrap();
        }

        assert_eq!(sku.suggest_sku(&category_id).await.unwrap(), "BEB004");
    }

    #[tokio::test]
    async fn test_suggestion_count_is_case_insensitive() {
        let (catalog, sku) = setup().await;
        let category_id = beverage_category(&catalog).await;

        // Stored upper-case regardless of input case
        catalog.add_product(new_product("beb001")).await.unwrap();

        assert_eq!(sku.suggest_sku(&category_id).await.unwrap(), "BEB002");
    }

    #[tokio::test]
    async fn test_unknown_category_is_not_found() {
        let (_, sku) = setup().await;

        let err = sku.suggest_sku("missing").await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_suggest_insert_race_loses_to_unique_constraint() {
        let (catalog, sku) = setup().await;
        let category_id = beverage_category(&catalog).await;

        // Two dialogs compute the same suggestion from the same count
        let first = sku.suggest_sku(&category_id).await.unwrap();
        let second = sku.suggest_sku(&category_id).await.unwrap();
        assert_eq!(first, second);

        catalog.add_product(new_product(&first)).await.unwrap();

        // The loser is rejected, not silently overwritten
        let err = catalog.add_product(new_product(&second)).await.unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateSku { .. }));

        // A fresh suggestion moves past the collision
        assert_eq!(sku.suggest_sku(&category_id).await.unwrap(), "BEB002");
    }
}
