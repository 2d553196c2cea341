//! # Cash Movement Repository
//!
//! Database operations for manual drawer movements.
//!
//! The drawer balance itself is derived, not stored: the cash service
//! combines `SaleRepository::total_for_day` with the withdrawal total
//! here. Each calendar day stands alone - there is no rollover row.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::DbResult;
use kiosk_core::CashMovement;

/// Repository for cash movement database operations.
#[derive(Debug, Clone)]
pub struct CashRepository {
    pool: SqlitePool,
}

impl CashRepository {
    /// Creates a new CashRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CashRepository { pool }
    }

    /// Records a movement.
    ///
    /// The funds guard lives in the cash service; by the time a movement
    /// reaches the repository it is already authorized.
    pub async fn insert(&self, movement: &CashMovement) -> DbResult<()> {
        debug!(kind = %movement.kind, amount_cents = movement.amount_cents, "Recording cash movement");

        sqlx::query(
            r#"
            INSERT INTO cash_movements (id, created_at, kind, amount_cents, memo, operator)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&movement.id)
        .bind(movement.created_at)
        .bind(movement.kind)
        .bind(movement.amount_cents)
        .bind(&movement.memo)
        .bind(&movement.operator)
        .execute(&self.pool)
        .await?;

        info!(id = %movement.id, amount_cents = movement.amount_cents, "Cash movement recorded");

        Ok(())
    }

    /// Withdrawals recorded on the given calendar day, most recent first.
    pub async fn withdrawals_for_day(&self, day: NaiveDate) -> DbResult<Vec<CashMovement>> {
        let day = day.format("%Y-%m-%d").to_string();

        let movements = sqlx::query_as::<_, CashMovement>(
            r#"
            SELECT id, created_at, kind, amount_cents, memo, operator
            FROM cash_movements
            WHERE DATE(created_at) = ?1 AND kind = 'withdrawal'
            ORDER BY created_at DESC
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Sum of withdrawal amounts for the given calendar day (0 for quiet
    /// days).
    pub async fn withdrawals_total_for_day(&self, day: NaiveDate) -> DbResult<i64> {
        let day = day.format("%Y-%m-%d").to_string();

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(amount_cents), 0)
            FROM cash_movements
            WHERE DATE(created_at) = ?1 AND kind = 'withdrawal'
            "#,
        )
        .bind(day)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }
}

/// Helper to generate a new cash movement ID.
pub fn generate_movement_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================
