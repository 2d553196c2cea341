//! # Service Error Types
//!
//! The error surface the presentation shell sees.
//!
//! ## Taxonomy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      ServiceError Taxonomy                              │
//! │                                                                         │
//! │  Validation      bad input shape/range (name, prefix, price, qty)      │
//! │  Duplicate*      uniqueness conflicts (SKU, category name/prefix)      │
//! │  Core            business outcomes (empty cart, insufficient stock,    │
//! │                  insufficient funds)                                    │
//! │  NotFound        missing id lookups                                    │
//! │  Storage         the store is unavailable or rejected the transaction  │
//! │                                                                         │
//! │  Only Storage may be transient; everything else is deterministic       │
//! │  for a given input and must not be retried unchanged.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant renders a human-readable message via `Display`; the shell
//! surfaces it verbatim. A rejected operation leaves prior state unchanged.

use thiserror::Error;

use kiosk_core::{CoreError, ValidationError};
use kiosk_db::DbError;

/// Errors returned by the Kiosk POS services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed shape/range validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Business rule outcome (empty cart, insufficient stock/funds).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A product with this SKU already exists (case-insensitive).
    ///
    /// Also the outcome of losing the SKU suggest/insert race: the unique
    /// constraint is the correctness boundary, the caller retries with a
    /// fresh suggestion.
    #[error("A product with SKU '{sku}' already exists")]
    DuplicateSku { sku: String },

    /// A category with this name already exists (case-insensitive,
    /// including deactivated categories).
    #[error("A category named '{name}' already exists")]
    DuplicateCategoryName { name: String },

    /// A category with this prefix already exists (case-insensitive,
    /// including deactivated categories).
    #[error("A category with prefix '{prefix}' already exists")]
    DuplicateCategoryPrefix { prefix: String },

    /// An id lookup came back empty.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The underlying store failed. The only class a caller may treat as
    /// potentially transient.
    #[error("Storage error: {0}")]
    Storage(#[from] DbError),
}

impl ServiceError {
    /// Whether a caller may reasonably retry the same operation unchanged.
    pub fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Storage(_))
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

// =============================================================================
// Unit Tests
// =============================================================================
