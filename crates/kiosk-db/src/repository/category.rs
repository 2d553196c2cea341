//! # Category Repository
//!
//! Database operations for categories.
//!
//! Categories are soft-deleted: `deactivate` flips `active` to 0 and
//! nothing else. Products referencing the category keep their denormalized
//! label, and the category's name and prefix stay reserved (the UNIQUE
//! NOCASE constraints span active and inactive rows alike).

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::DbResult;
use kiosk_core::Category;

/// Repository for category database operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    pool: SqlitePool,
}

impl CategoryRepository {
    /// Creates a new CategoryRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CategoryRepository { pool }
    }

    /// Inserts a new category.
    ///
    /// ## Returns
    /// * `Ok(())` - Inserted
    /// * `Err(DbError::UniqueViolation)` - Name or prefix already taken
    pub async fn insert(&self, category: &Category) -> DbResult<()> {
        debug!(name = %category.name, prefix = %category.prefix, "Inserting category");

        sqlx::query(
            r#"
            INSERT INTO categories (id, name, prefix, description, active, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.prefix)
        .bind(&category.description)
        .bind(category.active)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a category by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, prefix, description, active, created_at
            FROM categories
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Gets a category by name.
    ///
    /// Case-insensitive: the `name` column carries NOCASE collation, so a
    /// plain equality comparison matches regardless of case.
    pub async fn get_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, prefix, description, active, created_at
            FROM categories
            WHERE name = ?1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Gets a category by prefix (case-insensitive, same as `get_by_name`).
    ///
    /// Looks across active AND inactive categories: a deactivated
    /// category's prefix stays reserved.
    pub async fn get_by_prefix(&self, prefix: &str) -> DbResult<Option<Category>> {
        let category = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, prefix, description, active, created_at
            FROM categories
            WHERE prefix = ?1
            "#,
        )
        .bind(prefix)
        .fetch_optional(&self.pool)
        .await?;

        Ok(category)
    }

    /// Lists categories ordered by name.
    ///
    /// ## Arguments
    /// * `only_active` - Skip soft-deleted categories
    pub async fn list(&self, only_active: bool) -> DbResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, prefix, description, active, created_at
            FROM categories
            WHERE active = 1 OR ?1 = 0
            ORDER BY name
            "#,
        )
        .bind(only_active)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Updates a category's name, prefix and description.
    ///
    /// ## Returns
    /// `true` when a row was updated, `false` when the id is unknown.
    pub async fn update(&self, category: &Category) -> DbResult<bool> {
        debug!(id = %category.id, "Updating category");

        let result = sqlx::query(
            r#"
            UPDATE categories
            SET name = ?2, prefix = ?3, description = ?4
            WHERE id = ?1
            "#,
        )
        .bind(&category.id)
        .bind(&category.name)
        .bind(&category.prefix)
        .bind(&category.description)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Soft-deletes a category by setting active = 0.
    ///
    /// No cascading effect: products keep their category label, and the
    /// name/prefix remain reserved.
    pub async fn deactivate(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deactivating category");

        let result = sqlx::query(
            r#"
            UPDATE categories
            SET active = 0
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

/// Helper to generate a new category ID.
pub fn generate_category_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn category(name: &str, prefix: &str) -> Category {
        Category {
            id: generate_category_id(),
            name: name.to_string(),
            prefix: prefix.to_string(),
            description: None,
            active: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookups() {
        let db = test_db().await;
        let repo = db.categories();

        let cat = category("BEVERAGES", "BEB");
        repo.insert(&cat).await.unwrap();

        let by_id = repo.get_by_id(&cat.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "BEVERAGES");

        // Lookups are case-insensitive via column collation
        let by_name = repo.get_by_name("beverages").await.unwrap();
        assert!(by_name.is_some());

        let by_prefix = repo.get_by_prefix("beb").await.unwrap();
        assert!(by_prefix.is_some());
    }

    #[tokio::test]
    async fn test_duplicate_prefix_rejected_case_insensitively() {
        let db = test_db().await;
        let repo = db.categories();

        repo.insert(&category("BEVERAGES", "BEB")).await.unwrap();

        let err = repo.insert(&category("BEERS", "beb")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_deactivate_keeps_row_and_reservation() {
        let db = test_db().await;
        let repo = db.categories();

        let cat = category("SNACKS", "SNA");
        repo.insert(&cat).await.unwrap();

        assert!(repo.deactivate(&cat.id).await.unwrap());

        // Row still there, just inactive
        let fetched = repo.get_by_id(&cat.id).await.unwrap().unwrap();
        assert!(!fetched.active);

        // Hidden from the active listing, visible in the full one
        assert!(repo.list(true).await.unwrap().is_empty());
        assert_eq!(repo.list(false).await.unwrap().len(), 1);

        // Name and prefix stay reserved
        let err = repo.insert(&category("snacks", "XYZ")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_deactivate_unknown_id_is_false() {
        let db = test_db().await;
        assert!(!db.categories().deactivate("missing").await.unwrap());
    }
}
