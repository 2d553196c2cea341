//! # Domain Types
//!
//! Core domain types used throughout Kiosk POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Category     │   │    Product      │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  prefix (biz)   │   │  sku (business) │   │  total_cents    │       │
//! │  │  active         │   │  quantity       │   │  payment_method │       │
//! │  │  created_at     │   │  price_cents    │   │  operator       │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ owns            │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │  CashMovement   │   │    CartLine     │   │  SaleLineItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  kind           │   │  (input only)   │   │  (snapshot)     │       │
//! │  │  amount_cents   │   │  quantity       │   │  sku, name      │       │
//! │  │  memo           │   │  unit price     │   │  subtotal_cents │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every persisted entity has:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business ID where one exists (sku, category prefix) - human-readable
//!
//! ## Denormalized Category Label
//! `Product.category_label` is a free-text copy of the category name, not a
//! foreign key. Deactivating or renaming a category must never orphan or
//! hide existing products, so the label travels with the product.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Category
// =============================================================================

/// A product category.
///
/// Categories own the SKU prefix used by the SKU generator. They are
/// soft-deleted (`active = false`) so historical products keep displaying
/// their category label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, stored upper-case, case-insensitively unique.
    pub name: String,

    /// SKU prefix, 1-5 alphabetic characters, stored upper-case,
    /// case-insensitively unique across active AND inactive categories.
    pub prefix: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Soft-delete flag. Inactive categories still block their name and
    /// prefix from reuse.
    pub active: bool,

    /// When the category was created.
    pub created_at: DateTime<Utc>,
}

/// Input payload for creating a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub prefix: String,
    pub description: Option<String>,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier, stored upper-case,
    /// case-insensitively unique.
    pub sku: String,

    /// Display name shown to the cashier and on receipts.
    pub name: String,

    /// Optional description for product details.
    pub description: Option<String>,

    /// Quantity on hand. Never negative; only the sale path decrements it.
    pub quantity: i64,

    /// Unit price in cents (strictly positive).
    pub price_cents: i64,

    /// Low-stock threshold.
    pub min_stock: i64,

    /// Denormalized category name (free text, not a foreign key).
    pub category_label: String,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// A product is low-stock when on-hand quantity has fallen to or below
    /// its configured threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }

    /// Checks whether the requested quantity can be sold from live stock.
    #[inline]
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.quantity >= quantity
    }
}

/// Input payload for creating a product. The repository generates the id
/// and timestamps; the SKU is normalized to upper-case before insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub sku: String,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub price_cents: i64,
    pub min_stock: i64,
    pub category_label: String,
}

// =============================================================================
// Search Hit
// =============================================================================

/// A slim product row returned by checkout search.
///
/// The search query only selects what the cashier's result list renders;
/// full product rows come from `get_product` when needed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SearchHit {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    pub quantity: i64,
    /// Empty when the schema revision has no category column.
    pub category_label: String,
}

impl SearchHit {
    /// Returns the unit price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One proposed line of a sale, as built by the (out of scope) cart UI.
///
/// Carries the price/name/SKU captured when the cashier added the item.
/// The captured values become the immutable line-item snapshot; the
/// captured quantity is NOT trusted for stock - live stock is re-read at
/// commit time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

impl CartLine {
    /// Line subtotal (unit price × quantity).
    #[inline]
    pub fn subtotal_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a sale was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on an external terminal.
    Card,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
        }
    }
}

/// Parses the token the presentation shell sends.
impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cash" => Ok(PaymentMethod::Cash),
            "card" | "credit" | "debit" => Ok(PaymentMethod::Card),
            other => Err(ValidationError::InvalidFormat {
                field: "payment_method".to_string(),
                reason: format!("unknown method '{other}'"),
            }),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
    pub operator: String,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// A line item in a committed sale.
///
/// Uses the snapshot pattern: product details (sku, name, unit price) are
/// frozen at the moment of sale so later catalog edits never rewrite
/// historical receipts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// SKU at time of sale (frozen).
    pub sku: String,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Line subtotal (unit_price × quantity) at time of sale.
    pub subtotal_cents: i64,
}

impl SaleLineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line subtotal as Money.
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }
}

// =============================================================================
// Cash Movement
// =============================================================================

/// Kind of manual cash movement.
///
/// Withdrawal-only in the current scope; the schema CHECK leaves room for
/// deposits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "lowercase")]
pub enum CashMovementKind {
    Withdrawal,
}

impl fmt::Display for CashMovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CashMovementKind::Withdrawal => write!(f, "withdrawal"),
        }
    }
}

/// A manual cash movement against the drawer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CashMovement {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub kind: CashMovementKind,
    /// Always positive; the kind carries the direction.
    pub amount_cents: i64,
    pub memo: String,
    pub operator: String,
}

impl CashMovement {
    /// Returns the movement amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
