//! # Cart Commands
//!
//! Shell commands for cart manipulation.
//!
//! ## Cart Lifecycle
//! ```text
//! empty ──► cart add ──► cart qty / cart remove / cart customer / discount
//!                │                                   │
//!                └──────────► checkout (sale.rs) ◄───┘
//!                                   │
//!                              back to empty
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::state::{CartState, DbState};
use ferro_core::cart::CustomerRef;
use ferro_core::{Cart, CartLine, CartTotals};

/// Cart response including lines and totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub lines: Vec<CartLine>,
    pub customer_name: Option<String>,
    pub discount_code: Option<String>,
    pub totals: CartTotals,
}

impl From<&Cart> for CartResponse {
    fn from(cart: &Cart) -> Self {
        CartResponse {
            lines: cart.lines.clone(),
            customer_name: cart.customer.as_ref().map(|c| c.name.clone()),
            discount_code: cart.discount.as_ref().map(|d| d.code.clone()),
            totals: cart.totals(),
        }
    }
}

/// Gets the current cart contents.
pub fn get_cart(cart: &CartState) -> CartResponse {
    debug!("get_cart command");
    cart.with_cart(|c| CartResponse::from(c))
}

/// Adds a product to the cart, looked up by article number or name.
///
/// ## Behavior
/// - Exact article number match wins; otherwise the first search hit
/// - If the product is already in the cart: quantity increases
/// - Price is frozen at time of adding
pub async fn add_to_cart(
    db: &DbState,
    cart: &CartState,
    query: &str,
    quantity: Option<i64>,
) -> Result<CartResponse, AppError> {
    let quantity = quantity.unwrap_or(1);
    debug!(query = %query, quantity = %quantity, "add_to_cart command");

    if quantity <= 0 {
        return Err(AppError::validation("Quantity must be positive"));
    }

    let products = db.inner().products();
    let product = match products.get_by_article_number(query).await? {
        Some(p) => p,
        None => products
            .search(query, 1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::not_found("Product", query))?,
    };

    if !product.is_active {
        return Err(AppError::validation("Product is not available for sale"));
    }

    cart.with_cart_mut(|c| {
        c.add_item(&product, quantity)?;
        Ok::<CartResponse, AppError>(CartResponse::from(&*c))
    })
}

/// Sets the quantity of a cart line, addressed by article number.
///
/// A quantity of 0 (or less) removes the line.
pub fn update_cart_line(
    cart: &CartState,
    article: &str,
    quantity: i64,
) -> Result<CartResponse, AppError> {
    debug!(article = %article, quantity = %quantity, "update_cart_line command");

    cart.with_cart_mut(|c| {
        let product_id = c
            .lines
            .iter()
            .find(|l| l.article_number == article)
            .map(|l| l.product_id.clone())
            .ok_or_else(|| AppError::cart(format!("Article {} is not in the cart", article)))?;

        c.update_quantity(&product_id, quantity)?;
        Ok::<CartResponse, AppError>(CartResponse::from(&*c))
    })
}

/// Removes a line from the cart, addressed by article number.
pub fn remove_from_cart(cart: &CartState, article: &str) -> Result<CartResponse, AppError> {
    update_cart_line(cart, article, 0)
}

/// Assigns or clears the customer on the open sale.
///
/// An empty query clears the assignment (anonymous sale); otherwise the
/// customer is looked up by id or name fragment.
pub async fn assign_customer(
    db: &DbState,
    cart: &CartState,
    query: &str,
) -> Result<CartResponse, AppError> {
    debug!(query = %query, "assign_customer command");

    let query = query.trim();
    if query.is_empty() {
        return Ok(cart.with_cart_mut(|c| {
            c.set_customer(None);
            CartResponse::from(&*c)
        }));
    }

    let customer = db
        .inner()
        .customers()
        .find(query)
        .await?
        .ok_or_else(|| AppError::not_found("Customer", query))?;

    Ok(cart.with_cart_mut(|c| {
        c.set_customer(Some(CustomerRef::from(&customer)));
        CartResponse::from(&*c)
    }))
}

/// Clears all items from the cart (sale cancelled).
pub fn clear_cart(cart: &CartState) -> CartResponse {
    debug!("clear_cart command");

    cart.with_cart_mut(|c| {
        c.clear();
        CartResponse::from(&*c)
    })
}
