//! # Catalog Service
//!
//! Category and product administration.
//!
//! ## Responsibilities
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        CatalogService                                   │
//! │                                                                         │
//! │  Categories                       Products                              │
//! │  ├── add (name/prefix rules)      ├── add (SKU/price/quantity rules)   │
//! │  ├── update                       ├── update                           │
//! │  ├── deactivate (soft delete)     ├── delete (hard delete)             │
//! │  ├── list / get                   ├── list / get / get_by_sku          │
//! │  └── name+prefix stay reserved    └── count per category label         │
//! │                                                                         │
//! │  Normalization: category names, prefixes and SKUs are stored           │
//! │  upper-case. The database's UNIQUE NOCASE constraints backstop every   │
//! │  uniqueness rule checked here.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use tracing::info;

use crate::error::{ServiceError, ServiceResult};
use kiosk_core::validation::{
    validate_category_name, validate_prefix, validate_price_cents, validate_product_name,
    validate_sku, validate_stock_quantity,
};
use kiosk_core::{Category, NewCategory, NewProduct, Product};
use kiosk_db::repository::category::generate_category_id;
use kiosk_db::repository::product::generate_product_id;
use kiosk_db::{CategoryRepository, Database, ProductRepository};

/// Service for catalog administration.
#[derive(Debug, Clone)]
pub struct CatalogService {
    categories: CategoryRepository,
    products: ProductRepository,
}

impl CatalogService {
    /// Creates a new CatalogService over the given database.
    pub fn new(db: &Database) -> Self {
        CatalogService {
            categories: db.categories(),
            products: db.products(),
        }
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Adds a new category.
    ///
    /// ## Rules
    /// - Name: required, case-insensitively unique among ALL categories
    ///   (active or not)
    /// - Prefix: 1-5 alphabetic characters, case-insensitively unique among
    ///   ALL categories
    ///
    /// ## Returns
    /// The new category's id.
    pub async fn add_category(&self, new: NewCategory) -> ServiceResult<String> {
        validate_category_name(&new.name)?;
        validate_prefix(&new.prefix)?;

        let name = new.name.trim().to_uppercase();
        let prefix = new.prefix.trim().to_uppercase();

        // Pre-checks give precise conflict errors; the UNIQUE NOCASE
        // constraints below catch whatever races past them.
        if self.categories.get_by_name(&name).await?.is_some() {
            return Err(ServiceError::DuplicateCategoryName { name });
        }
        if self.categories.get_by_prefix(&prefix).await?.is_some() {
            return Err(ServiceError::DuplicateCategoryPrefix { prefix });
        }

        let category = Category {
            id: generate_category_id(),
            name: name.clone(),
            prefix: prefix.clone(),
            description: new.description,
            active: true,
            created_at: Utc::now(),
        };

        match self.categories.insert(&category).await {
            Ok(()) => {
                info!(id = %category.id, name = %category.name, "Category created");
                Ok(category.id)
            }
            Err(e) if e.is_unique_violation_on("name") => {
                Err(ServiceError::DuplicateCategoryName { name })
            }
            Err(e) if e.is_unique_violation_on("prefix") => {
                Err(ServiceError::DuplicateCategoryPrefix { prefix })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Updates a category's name, prefix and description.
    ///
    /// Existing products keep their denormalized category label; a rename
    /// does not rewrite them.
    pub async fn update_category(&self, category: &Category) -> ServiceResult<bool> {
        validate_category_name(&category.name)?;
        validate_prefix(&category.prefix)?;

        let mut normalized = category.clone();
        normalized.name = category.name.trim().to_uppercase();
        normalized.prefix = category.prefix.trim().to_uppercase();

        match self.categories.update(&normalized).await {
            Ok(updated) => Ok(updated),
            Err(e) if e.is_unique_violation_on("name") => {
                Err(ServiceError::DuplicateCategoryName {
                    name: normalized.name,
                })
            }
            Err(e) if e.is_unique_violation_on("prefix") => {
                Err(ServiceError::DuplicateCategoryPrefix {
                    prefix: normalized.prefix,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Soft-deletes a category.
    ///
    /// No cascading effect: products carrying the category's label remain
    /// intact, retrievable and searchable.
    pub async fn deactivate_category(&self, id: &str) -> ServiceResult<bool> {
        let deactivated = self.categories.deactivate(id).await?;
        if deactivated {
            info!(id = %id, "Category deactivated");
        }
        Ok(deactivated)
    }

    /// Lists categories ordered by name.
    pub async fn list_categories(&self, only_active: bool) -> ServiceResult<Vec<Category>> {
        Ok(self.categories.list(only_active).await?)
    }

    /// Gets a category by id.
    pub async fn get_category(&self, id: &str) -> ServiceResult<Option<Category>> {
        Ok(self.categories.get_by_id(id).await?)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Adds a new product.
    ///
    /// ## Rules
    /// - SKU: required, valid shape, case-insensitively unique (stored
    ///   upper-case)
    /// - Name: required
    /// - Price: strictly positive
    /// - Quantity: non-negative
    ///
    /// ## Returns
    /// The new product's id.
    pub async fn add_product(&self, new: NewProduct) -> ServiceResult<String> {
        validate_sku(&new.sku)?;
        validate_product_name(&new.name)?;
        validate_price_cents(new.price_cents)?;
        validate_stock_quantity(new.quantity)?;

        let sku = new.sku.trim().to_uppercase();

        if self.products.get_by_sku(&sku).await?.is_some() {
            return Err(ServiceError::DuplicateSku { sku });
        }

        let now = Utc::now();
        let product = Product {
            id: generate_product_id(),
            sku: sku.clone(),
            name: new.name.trim().to_string(),
            description: new.description,
            quantity: new.quantity,
            price_cents: new.price_cents,
            min_stock: new.min_stock,
            category_label: new.category_label,
            created_at: now,
            updated_at: now,
        };

        match self.products.insert(&product).await {
            Ok(()) => {
                info!(id = %product.id, sku = %product.sku, "Product created");
                Ok(product.id)
            }
            // The suggest/insert race lands here: the losing insert is
            // rejected, never silently overwritten.
            Err(e) if e.is_unique_violation_on("sku") => Err(ServiceError::DuplicateSku { sku }),
            Err(e) => Err(e.into()),
        }
    }

    /// Updates an existing product (price/quantity/threshold edits).
    pub async fn update_product(&self, product: &Product) -> ServiceResult<bool> {
        validate_product_name(&product.name)?;
        validate_price_cents(product.price_cents)?;
        validate_stock_quantity(product.quantity)?;

        Ok(self.products.update(product).await?)
    }

    /// Hard-deletes a product.
    pub async fn delete_product(&self, id: &str) -> ServiceResult<bool> {
        Ok(self.products.delete(id).await?)
    }

    /// Gets a product by id.
    pub async fn get_product(&self, id: &str) -> ServiceResult<Option<Product>> {
        Ok(self.products.get_by_id(id).await?)
    }

    /// Gets a product by SKU (case-insensitive).
    pub async fn get_product_by_sku(&self, sku: &str) -> ServiceResult<Option<Product>> {
        Ok(self.products.get_by_sku(sku).await?)
    }

    /// Lists all products ordered by name.
    pub async fn list_products(&self) -> ServiceResult<Vec<Product>> {
        Ok(self.products.list().await?)
    }

    /// Counts products carrying the given category label.
    ///
    /// Used by the catalog display; zero matches is a normal answer.
    pub async fn count_products_in_category(&self, category_name: &str) -> ServiceResult<i64> {
        Ok(self.products.count_in_category(category_name).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use kiosk_core::ValidationError;
    use kiosk_db::DbConfig;

    async fn service() -> CatalogService {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        CatalogService::new(&db)
    }

    fn new_category(name: &str, prefix: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            prefix: prefix.to_string(),
            description: None,
        }
    }

    fn new_product(sku: &str, name: &str, price_cents: i64, quantity: i64) -> NewProduct {
        NewProduct {
            sku: sku.to_string(),
            name: name.to_string(),
            description: None,
            quantity,
            price_cents,
            min_stock: 5,
            category_label: "BEVERAGES".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_category_normalizes_and_stores() {
        let svc = service().await;

        let id = svc
            .add_category(new_category("beverages", "beb"))
            .await
            .unwrap();

        let cat = svc.get_category(&id).await.unwrap().unwrap();
        assert_eq!(cat.name, "BEVERAGES");
        assert_eq!(cat.prefix, "BEB");
        assert!(cat.active);
    }

    #[tokio::test]
    async fn test_add_category_rejects_bad_prefix() {
        let svc = service().await;

        for bad in ["", "TOOLONG", "AB1"] {
            let err = svc
                .add_category(new_category("BEVERAGES", bad))
                .await
                .unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "prefix {bad:?}");
        }
    }

    #[tokio::test]
    async fn test_add_category_rejects_duplicates_case_insensitively() {
        let svc = service().await;
        svc.add_category(new_category("BEVERAGES", "BEB"))
            .await
            .unwrap();

        let err = svc
            .add_category(new_category("Beverages", "XYZ"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateCategoryName { .. }));

        let err = svc
            .add_category(new_category("BEERS", "beb"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateCategoryPrefix { .. }));
    }

    #[tokio::test]
    async fn test_deactivated_category_still_blocks_name_and_prefix() {
        let svc = service().await;
        let id = svc
            .add_category(new_category("BEVERAGES", "BEB"))
            .await
            .unwrap();
        assert!(svc.deactivate_category(&id).await.unwrap());

        let err = svc
            .add_category(new_category("BEVERAGES", "NEW"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateCategoryName { .. }));
    }

    #[tokio::test]
    async fn test_deactivate_category_leaves_products_intact() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let svc = CatalogService::new(&db);
        let sales = crate::sale::SaleService::new(&db);

        let id = svc
            .add_category(new_category("BEVERAGES", "BEB"))
            .await
            .unwrap();

        let product_id = svc
            .add_product(NewProduct {
                category_label: "BEVERAGES".to_string(),
                ..new_product("BEB001", "Coca-Cola 600ml", 2500, 50)
            })
            .await
            .unwrap();

        assert!(svc.deactivate_category(&id).await.unwrap());

        // Product retrievable, label untouched, still countable
        let p = svc.get_product(&product_id).await.unwrap().unwrap();
        assert_eq!(p.category_label, "BEVERAGES");
        assert_eq!(svc.count_products_in_category("BEVERAGES").await.unwrap(), 1);

        // ...and still searchable, including through the dormant label
        assert_eq!(sales.search("coca").await.unwrap().len(), 1);
        assert_eq!(sales.search("beverages").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_product_validations() {
        let svc = service().await;

        let err = svc
            .add_product(new_product("BEB001", "", 2500, 50))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::Required { .. })
        ));

        let err = svc
            .add_product(new_product("BEB001", "Coca-Cola", 0, 50))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::MustBePositive { .. })
        ));

        let err = svc
            .add_product(new_product("BEB001", "Coca-Cola", 2500, -1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::MustBeNonNegative { .. })
        ));
    }

    #[tokio::test]
    async fn test_add_product_uppercases_sku_and_rejects_duplicates() {
        let svc = service().await;

        let id = svc
            .add_product(new_product("beb001", "Coca-Cola 600ml", 2500, 50))
            .await
            .unwrap();
        let p = svc.get_product(&id).await.unwrap().unwrap();
        assert_eq!(p.sku, "BEB001");

        let err = svc
            .add_product(new_product("Beb001", "Bootleg Cola", 1000, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::DuplicateSku { .. }));
    }

    #[tokio::test]
    async fn test_count_products_in_category_tolerates_zero() {
        let svc = service().await;
        assert_eq!(svc.count_products_in_category("FROZEN").await.unwrap(), 0);
    }
}
