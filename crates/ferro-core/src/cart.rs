//! # Cart Module
//!
//! The in-progress sale aggregate: lines being edited, the assigned
//! customer, and the single applied discount.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Lifecycle                                     │
//! │                                                                         │
//! │  Cart::new() ──► add_item / update_quantity / remove_line               │
//! │        │                 set_customer / apply_discount                  │
//! │        │                         │                                      │
//! │        │                         ▼                                      │
//! │        │                 totals() recomputed in full on every read      │
//! │        │                         │                                      │
//! │        │                         ▼                                      │
//! │        │                 checkout (commands layer):                     │
//! │        │                   assign id + timestamp, persist,              │
//! │        │                   decrement stock, then clear()                │
//! │        ▼                         │                                      │
//! │  empty cart ◄────────────────────┘                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Lines are unique by `product_id` (adding the same product merges)
//! - Setting a quantity ≤ 0 removes the line rather than erroring
//! - At most one discount is applied at a time
//! - Totals are never cached: every read walks the lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Customer, Discount, Product};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Line
// =============================================================================

/// One product line in the open cart.
///
/// ## Price Freezing
/// `unit_price_cents` is captured when the line is created. If the product
/// price changes in the catalog afterwards, this line keeps the price the
/// customer saw when the item was rung up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product ID (UUID).
    pub product_id: String,

    /// Article number at time of adding (frozen).
    pub article_number: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Price in cents at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Quantity in the cart.
    pub quantity: i64,
}

impl CartLine {
    /// Creates a new cart line from a product and quantity.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            article_number: product.article_number.clone(),
            name: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
        }
    }

    /// Calculates the line total (unit price × quantity).
    pub fn line_total_cents(&self) -> i64 {
        self.unit_price_cents * self.quantity
    }

    /// Returns the line total as Money.
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents())
    }
}

// =============================================================================
// Customer Reference
// =============================================================================

/// Customer attribution for the open cart.
///
/// Only the fields needed for the receipt are snapshotted; the full record
/// stays in the customer catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRef {
    pub id: String,
    pub name: String,
}

impl From<&Customer> for CustomerRef {
    fn from(c: &Customer) -> Self {
        CustomerRef {
            id: c.id.clone(),
            name: c.name.clone(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The open sale being built at the register.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    /// Lines in the cart, in the order they were first added.
    pub lines: Vec<CartLine>,

    /// Optional customer the sale will be attributed to.
    pub customer: Option<CustomerRef>,

    /// The single discount applied to the whole sale, if any.
    pub discount: Option<Discount>,

    /// When the cart was created or last cleared.
    pub started_at: Option<DateTime<Utc>>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart {
            lines: Vec::new(),
            customer: None,
            discount: None,
            started_at: None,
        }
    }

    /// Adds a product to the cart or increases quantity if already present.
    ///
    /// ## Behavior
    /// - If the product is already in the cart: increases the quantity
    /// - If not: appends a new line with the price frozen now
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> CoreResult<()> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let new_qty = line.quantity + quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        self.lines.push(CartLine::from_product(product, quantity));
        Ok(())
    }

    /// Sets the quantity of a line in the cart.
    ///
    /// ## Behavior
    /// - Quantity ≤ 0: removes the line (not an error)
    /// - Product not found: returns `ProductNotInCart`
    pub fn update_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_line(product_id);
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        match self.lines.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => {
                line.quantity = quantity;
                Ok(())
            }
            None => Err(CoreError::ProductNotInCart(product_id.to_string())),
        }
    }

    /// Removes a line from the cart by product ID.
    pub fn remove_line(&mut self, product_id: &str) -> CoreResult<()> {
        let initial_len = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);

        if self.lines.len() == initial_len {
            Err(CoreError::ProductNotInCart(product_id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Assigns or clears the customer for this sale.
    pub fn set_customer(&mut self, customer: Option<CustomerRef>) {
        self.customer = customer;
    }

    /// Applies a discount, replacing any previously applied one.
    pub fn apply_discount(&mut self, discount: Discount) {
        self.discount = Some(discount);
    }

    /// Removes the applied discount. The next totals read restores
    /// total == subtotal.
    pub fn remove_discount(&mut self) {
        self.discount = None;
    }

    /// Clears the cart back to a fresh empty sale.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer = None;
        self.discount = None;
        self.started_at = None;
    }

    /// Checks if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Calculates the subtotal (sum of line totals).
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.lines.iter().map(|l| l.line_total_cents()).sum())
    }

    /// Computes the full totals for the cart.
    ///
    /// ## No Incremental State
    /// Every call walks the lines and reapplies the discount. The cart
    /// carries no cached totals that could drift out of sync with its
    /// contents.
    pub fn totals(&self) -> CartTotals {
        let subtotal = self.subtotal();
        let discount_amount = match &self.discount {
            Some(d) => d.amount_for(subtotal),
            None => Money::zero(),
        };
        let total = subtotal - discount_amount;

        CartTotals {
            line_count: self.line_count(),
            total_quantity: self.total_quantity(),
            subtotal_cents: subtotal.cents(),
            discount_cents: discount_amount.cents(),
            total_cents: total.cents(),
        }
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartTotals {
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DiscountKind;

    fn test_product(id: &str, price_cents: i64) -> Product {
        Product {
            id: id.to_string(),
            article_number: format!("ART-{}", id),
            name: format!("Product {}", id),
            description: None,
            category: "Tools".to_string(),
            price_cents,
            stock: 50,
            min_stock: 5,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_add_item() {
        let mut cart = Cart::new();
        let product = test_product("1", 1250);

        cart.add_item(&product, 2).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        assert_eq!(cart.subtotal().cents(), 2500);
    }

    #[test]
    fn test_add_same_product_merges_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 1250);

        cart.add_item(&product, 2).unwrap();
        cart.add_item(&product, 3).unwrap();

        assert_eq!(cart.line_count(), 1); // Still one line
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn test_subtotal_is_sum_of_merged_lines() {
        let mut cart = Cart::new();
        let a = test_product("1", 1250);
        let b = test_product("2", 599);

        cart.add_item(&a, 1).unwrap();
        cart.add_item(&b, 4).unwrap();
        cart.add_item(&a, 2).unwrap();

        // 3 × 1250 + 4 × 599
        assert_eq!(cart.subtotal().cents(), 3 * 1250 + 4 * 599);
        assert_eq!(cart.line_count(), 2);
    }

    #[test]
    fn test_price_frozen_at_add_time() {
        let mut cart = Cart::new();
        let mut product = test_product("1", 1250);

        cart.add_item(&product, 1).unwrap();

        // Catalog price change after the line exists does not affect it.
        product.price_cents = 9999;
        assert_eq!(cart.subtotal().cents(), 1250);
    }

    #[test]
    fn test_update_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 1250);

        cart.add_item(&product, 2).unwrap();
        cart.update_quantity("1", 0).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_negative_removes_line() {
        let mut cart = Cart::new();
        let product = test_product("1", 1250);

        cart.add_item(&product, 2).unwrap();
        cart.update_quantity("1", -3).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_missing_product_errors() {
        let mut cart = Cart::new();
        let err = cart.update_quantity("nope", 2).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotInCart(_)));
    }

    #[test]
    fn test_percentage_discount_totals() {
        let mut cart = Cart::new();
        let product = test_product("1", 10000);
        cart.add_item(&product, 1).unwrap();

        let ten_pct = Discount::new("TOTAL10", DiscountKind::Percentage, 1000, "10% off");
        cart.apply_discount(ten_pct);

        let totals = cart.totals();
        assert_eq!(totals.subtotal_cents, 10000);
        assert_eq!(totals.discount_cents, 1000);
        assert_eq!(totals.total_cents, 9000);
    }

    /// One line (unit price $15.50, qty 3) with a fixed $10.00 discount:
    /// subtotal $46.50, discount $10.00, total $36.50.
    #[test]
    fn test_fixed_discount_example() {
        let mut cart = Cart::new();
        let product = test_product("1", 1550);
        cart.add_item(&product, 3).unwrap();

        let fixed = Discount::new("TEN", DiscountKind::FixedAmount, 1000, "$10 off");
        cart.apply_discount(fixed);

        let totals = cart.totals();
        assert_eq!(totals.subtotal_cents, 4650);
        assert_eq!(totals.discount_cents, 1000);
        assert_eq!(totals.total_cents, 3650);
    }

    #[test]
    fn test_fixed_discount_never_negative_total() {
        let mut cart = Cart::new();
        let product = test_product("1", 350);
        cart.add_item(&product, 1).unwrap();

        let fixed = Discount::new("FIX50", DiscountKind::FixedAmount, 5000, "$50 off");
        cart.apply_discount(fixed);

        let totals = cart.totals();
        assert_eq!(totals.discount_cents, 350);
        assert_eq!(totals.total_cents, 0);
    }

    #[test]
    fn test_remove_discount_restores_total() {
        let mut cart = Cart::new();
        let product = test_product("1", 4650);
        cart.add_item(&product, 1).unwrap();

        cart.apply_discount(Discount::new(
            "PROMO25",
            DiscountKind::Percentage,
            2500,
            "25% off",
        ));
        assert_ne!(cart.totals().total_cents, cart.totals().subtotal_cents);

        cart.remove_discount();
        let totals = cart.totals();
        assert_eq!(totals.total_cents, totals.subtotal_cents);
    }

    #[test]
    fn test_applying_discount_replaces_previous() {
        let mut cart = Cart::new();
        let product = test_product("1", 10000);
        cart.add_item(&product, 1).unwrap();

        cart.apply_discount(Discount::new(
            "TOTAL10",
            DiscountKind::Percentage,
            1000,
            "10%",
        ));
        cart.apply_discount(Discount::new(
            "PROMO25",
            DiscountKind::Percentage,
            2500,
            "25%",
        ));

        assert_eq!(cart.totals().discount_cents, 2500);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = Cart::new();
        let product = test_product("1", 1250);
        cart.add_item(&product, 2).unwrap();
        cart.set_customer(Some(CustomerRef {
            id: "c-1".to_string(),
            name: "Ana Gomez".to_string(),
        }));
        cart.apply_discount(Discount::new(
            "TOTAL10",
            DiscountKind::Percentage,
            1000,
            "10%",
        ));

        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.customer.is_none());
        assert!(cart.discount.is_none());
        assert_eq!(cart.totals().total_cents, 0);
    }

    #[test]
    fn test_quantity_cap_enforced() {
        let mut cart = Cart::new();
        let product = test_product("1", 100);

        let err = cart.add_item(&product, 1000).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));

        cart.add_item(&product, 998).unwrap();
        let err = cart.add_item(&product, 2).unwrap_err();
        assert!(matches!(err, CoreError::QuantityTooLarge { .. }));
    }
}
