//! # Validation Module
//!
//! Input validation utilities for Kiosk POS.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Presentation shell                                           │
//! │  ├── Basic format checks (empty fields, numeric input)                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Services (Rust)                                              │
//! │  └── THIS MODULE: Business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── UNIQUE NOCASE constraints (sku, category name/prefix)            │
//! │  └── CHECK (quantity >= 0)                                             │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::{MAX_CART_LINES, MAX_LINE_QUANTITY, MAX_PREFIX_LEN, MIN_SEARCH_TERM_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Category Validators
// =============================================================================

/// Validates a category SKU prefix.
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 5 characters
/// - Must contain only alphabetic characters
///
/// Uniqueness is a catalog-store concern, not checked here.
///
/// ## Example
/// ```rust
/// use kiosk_core::validation::validate_prefix;
///
/// assert!(validate_prefix("BEB").is_ok());
/// assert!(validate_prefix("").is_err());
/// assert!(validate_prefix("BEB01").is_err());
/// assert!(validate_prefix("BEVERAGE").is_err());
/// ```
pub fn validate_prefix(prefix: &str) -> ValidationResult<()> {
    let prefix = prefix.trim();

    if prefix.is_empty() {
        return Err(ValidationError::Required {
            field: "prefix".to_string(),
        });
    }

    if prefix.chars().count() > MAX_PREFIX_LEN {
        return Err(ValidationError::TooLong {
            field: "prefix".to_string(),
            max: MAX_PREFIX_LEN,
        });
    }

    if !prefix.chars().all(|c| c.is_alphabetic()) {
        return Err(ValidationError::InvalidFormat {
            field: "prefix".to_string(),
            reason: "must contain only letters".to_string(),
        });
    }

    Ok(())
}

/// Validates a category name.
pub fn validate_category_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Product Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - Must be at most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a product name.
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be strictly positive; zero-priced catalog entries are rejected
///
/// ## Example
/// ```rust
/// use kiosk_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(2500).is_ok());
/// assert!(validate_price_cents(0).is_err());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an on-hand stock quantity.
///
/// ## Rules
/// - Must be non-negative; zero is a valid (sold out) state
pub fn validate_stock_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates a cart line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY (999)
pub fn validate_line_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates cart size (number of line items).
pub fn validate_cart_size(lines: usize) -> ValidationResult<()> {
    if lines > MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart items".to_string(),
            min: 1,
            max: MAX_CART_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Cash Validators
// =============================================================================

/// Validates a withdrawal amount in cents.
///
/// Only the shape is checked here; the available-balance guard lives in
/// the cash ledger where the day's totals are known.
pub fn validate_withdrawal_amount(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "amount".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Search Validators
// =============================================================================

/// Checks whether a search term is long enough to run a query.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Checkout: Search box                                                   │
/// │                                                                         │
/// │  Cashier types: "b"     → term_is_searchable = false → no query        │
/// │  Cashier types: "be"    → term_is_searchable = true  → ranked query    │
/// │  Cashier types: "beb001"→ exact SKU match ranks first                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
///
/// Short terms are a no-op, not an error: the UI searches per keystroke.
pub fn term_is_searchable(term: &str) -> bool {
    term.trim().chars().count() >= MIN_SEARCH_TERM_LEN
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_prefix() {
        // Valid prefixes
        assert!(validate_prefix("BEB").is_ok());
        assert!(validate_prefix("B").is_ok());
        assert!(validate_prefix("SNACK").is_ok());
        assert!(validate_prefix("beb").is_ok()); // normalized upper elsewhere

        // Invalid prefixes
        assert!(validate_prefix("").is_err());
        assert!(validate_prefix("   ").is_err());
        assert!(validate_prefix("BEBIDA").is_err()); // 6 chars
        assert!(validate_prefix("BEB01").is_err()); // digits
        assert!(validate_prefix("BE-B").is_err());
    }

    #[test]
    fn test_validate_category_name() {
        assert!(validate_category_name("Beverages").is_ok());
        assert!(validate_category_name("").is_err());
        assert!(validate_category_name(&"A".repeat(150)).is_err());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("BEB001").is_ok());
        assert!(validate_sku("COKE-330").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Coca-Cola 600ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_price_cents_strictly_positive() {
        assert!(validate_price_cents(1).is_ok());
        assert!(validate_price_cents(2500).is_ok());
        assert!(validate_price_cents(0).is_err());
        assert!(validate_price_cents(-100).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(50).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_line_quantity() {
        assert!(validate_line_quantity(1).is_ok());
        assert!(validate_line_quantity(999).is_ok());

        assert!(validate_line_quantity(0).is_err());
        assert!(validate_line_quantity(-1).is_err());
        assert!(validate_line_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_cart_size() {
        assert!(validate_cart_size(1).is_ok());
        assert!(validate_cart_size(100).is_ok());
        assert!(validate_cart_size(101).is_err());
    }

    #[test]
    fn test_validate_withdrawal_amount() {
        assert!(validate_withdrawal_amount(7000).is_ok());
        assert!(validate_withdrawal_amount(0).is_err());
        assert!(validate_withdrawal_amount(-500).is_err());
    }

    #[test]
    fn test_term_is_searchable() {
        assert!(!term_is_searchable(""));
        assert!(!term_is_searchable("b"));
        assert!(!term_is_searchable(" b "));
        assert!(term_is_searchable("be"));
        assert!(term_is_searchable("beb001"));
    }
}
