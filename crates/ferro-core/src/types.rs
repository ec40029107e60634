//! # Domain Types
//!
//! Core domain types used throughout Ferro POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │    Discount     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  code (key)     │       │
//! │  │  article_number │   │  name           │   │  kind           │       │
//! │  │  price_cents    │   │  phone / email  │   │  value          │       │
//! │  │  stock          │   │  address        │   │  amount_for()   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │      Sale       │   │    SaleLine     │   (committed history;       │
//! │  │  totals, stamps │   │  frozen copies  │    the open cart lives      │
//! │  └─────────────────┘   └─────────────────┘    in the cart module)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Entities have:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: (article_number, discount code) - human-readable

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product in the hardware store catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Article number - business identifier printed on the shelf label.
    pub article_number: String,

    /// Display name shown in listings and on receipts.
    pub name: String,

    /// Optional free-text description.
    pub description: Option<String>,

    /// Category used for browsing (e.g. "Tools", "Plumbing").
    pub category: String,

    /// Unit price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units currently on hand. Never negative: an over-decrement at
    /// checkout clamps here rather than going below zero.
    pub stock: i64,

    /// Stock level below which the product shows up in restock alerts.
    pub min_stock: i64,

    /// Whether the product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether the stock has fallen below the reorder threshold.
    pub fn needs_restock(&self) -> bool {
        self.stock < self.min_stock
    }
}

// =============================================================================
// Customer
// =============================================================================

/// A registered customer. Sales can optionally be attributed to one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Discount
// =============================================================================

/// How a discount value is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    /// Multiplicative: `value` is in basis points (1000 = 10%).
    Percentage,
    /// Subtractive: `value` is in cents, capped at the base amount.
    FixedAmount,
}

/// A discount that can be applied to a sale.
///
/// ## Value Semantics
/// The meaning of `value` depends on `kind`:
/// - `Percentage`: basis points (2500 = 25%)
/// - `FixedAmount`: cents (5000 = $50.00)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Discount {
    /// Business key, stored uppercase (e.g. "TOTAL10", "PROMO25").
    pub code: String,
    pub kind: DiscountKind,
    pub value: i64,
    pub description: String,
}

impl Discount {
    /// Creates a discount, normalizing the code to uppercase.
    pub fn new(
        code: impl Into<String>,
        kind: DiscountKind,
        value: i64,
        description: impl Into<String>,
    ) -> Self {
        Discount {
            code: code.into().to_uppercase(),
            kind,
            value,
            description: description.into(),
        }
    }

    /// Calculates the amount this discount takes off a base amount.
    ///
    /// ## Behavior
    /// - `Percentage`: base × value basis points, rounded half-up
    /// - `FixedAmount`: min(value, base), so a fixed discount can never
    ///   push a total negative
    ///
    /// ## Example
    /// ```rust
    /// use ferro_core::money::Money;
    /// use ferro_core::types::{Discount, DiscountKind};
    ///
    /// let ten_pct = Discount::new("TOTAL10", DiscountKind::Percentage, 1000, "10% off");
    /// assert_eq!(ten_pct.amount_for(Money::from_cents(4650)).cents(), 465);
    ///
    /// let fixed = Discount::new("FIX50", DiscountKind::FixedAmount, 5000, "$50 off");
    /// assert_eq!(fixed.amount_for(Money::from_cents(4650)).cents(), 4650);
    /// ```
    pub fn amount_for(&self, base: Money) -> Money {
        match self.kind {
            DiscountKind::Percentage => base.percentage(self.value as u32),
            DiscountKind::FixedAmount => Money::from_cents(self.value).min(base),
        }
    }
}

// =============================================================================
// Sale (committed transaction)
// =============================================================================

/// A committed sale transaction.
///
/// The open cart (lines being edited, discount being toggled) lives in
/// [`crate::cart::Cart`]; a `Sale` is only created at checkout, when the
/// cart is assigned an id and a timestamp and moved to history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Sale {
    pub id: String,
    /// Customer attribution, frozen at checkout (may be anonymous).
    pub customer_id: Option<String>,
    pub customer_name: Option<String>,
    /// Code of the discount applied, if any.
    pub discount_code: Option<String>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the final total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item of a committed sale.
/// Uses the snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// Article number at time of sale (frozen).
    pub article_snapshot: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Quantity sold.
    pub quantity: i64,
    /// Line total (unit_price × quantity).
    pub line_total_cents: i64,
}

impl SaleLine {
    /// Returns the frozen unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn hammer() -> Product {
        Product {
            id: "p-1".to_string(),
            article_number: "TOOL-001".to_string(),
            name: "Claw Hammer".to_string(),
            description: Some("Forged steel".to_string()),
            category: "Tools".to_string(),
            price_cents: 1250,
            stock: 3,
            min_stock: 5,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_product_price_and_restock() {
        let p = hammer();
        assert_eq!(p.price().cents(), 1250);
        assert!(p.needs_restock());
    }

    #[test]
    fn test_discount_code_normalized() {
        let d = Discount::new("total10", DiscountKind::Percentage, 1000, "10% off");
        assert_eq!(d.code, "TOTAL10");
    }

    #[test]
    fn test_percentage_discount_amount() {
        let d = Discount::new("TOTAL10", DiscountKind::Percentage, 1000, "10% off");
        assert_eq!(d.amount_for(Money::from_cents(10000)).cents(), 1000);
    }

    #[test]
    fn test_fixed_discount_capped_at_base() {
        let d = Discount::new("FIX50", DiscountKind::FixedAmount, 5000, "$50 off");
        // Base below the discount value: capped, never negative.
        assert_eq!(d.amount_for(Money::from_cents(4650)).cents(), 4650);
        // Base above the discount value: full amount.
        assert_eq!(d.amount_for(Money::from_cents(9000)).cents(), 5000);
    }
}
