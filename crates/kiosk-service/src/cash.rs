//! # Cash Service
//!
//! Drawer reconciliation: the available balance and the withdrawal guard.
//!
//! ## Balance Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   available(day) invariant                              │
//! │                                                                         │
//! │  available(day) = Σ sale.total (that day) − Σ withdrawals (that day)   │
//! │                                                                         │
//! │  Day with $100.00 sales, $30.00 withdrawn:                             │
//! │    withdraw $80.00 → rejected, available is $70.00                     │
//! │    withdraw $70.00 → accepted, available is now $0.00                  │
//! │                                                                         │
//! │  Calendar-day scope, no rollover: each day's balance stands alone      │
//! │  and conceptually resets at midnight. Historical days stay queryable   │
//! │  but never feed "today's" balance.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{NaiveDate, Utc};
use tracing::info;

use crate::error::ServiceResult;
use kiosk_core::validation::validate_withdrawal_amount;
use kiosk_core::{CashMovement, CashMovementKind, CoreError, Money, Sale};
use kiosk_db::repository::cash::generate_movement_id;
use kiosk_db::{CashRepository, Database, SaleRepository};

/// Service for the cash drawer ledger.
#[derive(Debug, Clone)]
pub struct CashService {
    sales: SaleRepository,
    cash: CashRepository,
}

impl CashService {
    /// Creates a new CashService over the given database.
    pub fn new(db: &Database) -> Self {
        CashService {
            sales: db.sales(),
            cash: db.cash(),
        }
    }

    /// Cash available in the drawer for the given calendar day:
    /// that day's sale totals minus that day's withdrawals.
    ///
    /// Days with zero activity yield $0.00, not an error.
    pub async fn available_balance(&self, day: NaiveDate) -> ServiceResult<Money> {
        let sales = self.sales.total_for_day(day).await?;
        let withdrawals = self.cash.withdrawals_total_for_day(day).await?;

        Ok(Money::from_cents(sales - withdrawals))
    }

    /// Today's available balance.
    pub async fn available_balance_today(&self) -> ServiceResult<Money> {
        self.available_balance(Utc::now().date_naive()).await
    }

    /// Records a cash withdrawal against today's drawer.
    ///
    /// ## Guard
    /// The amount must be positive and must not exceed the available
    /// balance computed at recording time. Withdrawing the exact available
    /// amount is allowed and brings the drawer to $0.00.
    ///
    /// ## Returns
    /// The new movement's id.
    pub async fn record_withdrawal(
        &self,
        amount_cents: i64,
        memo: &str,
        operator: &str,
    ) -> ServiceResult<String> {
        validate_withdrawal_amount(amount_cents)?;

        let available = self.available_balance_today().await?;
        if amount_cents > available.cents() {
            return Err(CoreError::InsufficientFunds { available }.into());
        }

        let movement = CashMovement {
            id: generate_movement_id(),
            created_at: Utc::now(),
            kind: CashMovementKind::Withdrawal,
            amount_cents,
            memo: memo.to_string(),
            operator: operator.to_string(),
        };

        self.cash.insert(&movement).await?;

        info!(
            id = %movement.id,
            amount = %movement.amount(),
            "Withdrawal recorded"
        );

        Ok(movement.id)
    }

    /// Sales recorded on the given day, most recent first.
    pub async fn sales_for_day(&self, day: NaiveDate) -> ServiceResult<Vec<Sale>> {
        Ok(self.sales.sales_for_day(day).await?)
    }

    /// Withdrawals recorded on the given day, most recent first.
    pub async fn withdrawals_for_day(&self, day: NaiveDate) -> ServiceResult<Vec<CashMovement>> {
        Ok(self.cash.withdrawals_for_day(day).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
