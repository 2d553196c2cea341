//! # Error Types
//!
//! Domain-specific error types for kiosk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  kiosk-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  kiosk-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  kiosk-service errors (separate crate)                                 │
//! │  └── ServiceError     - What the presentation shell sees               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ServiceError → Shell    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (SKU, name, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations or domain logic failures.
/// They should be caught and translated to user-friendly messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insufficient stock to complete a sale.
    ///
    /// ## When This Occurs
    /// - A cart line requests more than the live on-hand quantity
    /// - The product was deleted between cart-add and pay
    ///
    /// ## User Workflow
    /// ```text
    /// Pay (Coca-Cola 600ml, qty: 5)
    ///      │
    ///      ▼
    /// Re-read live stock: quantity = 3
    ///      │
    ///      ▼
    /// InsufficientStock { product_name: "Coca-Cola 600ml" }
    ///      │
    ///      ▼
    /// UI shows: "Insufficient stock for Coca-Cola 600ml"
    /// ```
    #[error("Insufficient stock for {product_name}")]
    InsufficientStock { product_name: String },

    /// A sale was attempted with no line items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Withdrawal exceeds the drawer's available balance.
    #[error("Insufficient funds: available {available}")]
    InsufficientFunds { available: crate::money::Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    MustBeNonNegative { field: String },

    /// Invalid format (e.g., non-alphabetic prefix, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Duplicate value (e.g., duplicate SKU).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
