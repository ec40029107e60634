//! # Discount Commands
//!
//! Listing discount codes and toggling the one applied to the open sale.
//!
//! The original register UI routed the chosen discount through a listener
//! callback from a selection dialog; here the lookup result is simply
//! applied to the cart and returned.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::cart::CartResponse;
use crate::error::AppError;
use crate::state::{CartState, DbState};
use ferro_core::validation::validate_percentage_bps;
use ferro_core::{CoreError, Discount, DiscountKind};

/// Discount DTO for shell display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountDto {
    pub code: String,
    pub kind: DiscountKind,
    pub value: i64,
    pub description: String,
}

impl From<Discount> for DiscountDto {
    fn from(d: Discount) -> Self {
        DiscountDto {
            code: d.code,
            kind: d.kind,
            value: d.value,
            description: d.description,
        }
    }
}

/// Lists the available discount codes.
pub async fn list_discounts(db: &DbState) -> Result<Vec<DiscountDto>, AppError> {
    debug!("list_discounts command");

    let discounts = db.inner().discounts().list().await?;
    Ok(discounts.into_iter().map(DiscountDto::from).collect())
}

/// Registers a new discount code.
///
/// ## Value Semantics
/// `value` is basis points for `Percentage` (1250 = 12.5%), cents for
/// `FixedAmount`.
pub async fn add_discount(
    db: &DbState,
    code: &str,
    kind: DiscountKind,
    value: i64,
    description: &str,
) -> Result<DiscountDto, AppError> {
    debug!(code = %code, ?kind, value = %value, "add_discount command");

    match kind {
        DiscountKind::Percentage => {
            validate_percentage_bps(value).map_err(CoreError::from)?;
        }
        DiscountKind::FixedAmount => {
            if value <= 0 {
                return Err(AppError::validation("Discount amount must be positive"));
            }
        }
    }

    let discount = Discount::new(code, kind, value, description);
    db.inner().discounts().insert(&discount).await?;

    info!(code = %discount.code, "Discount registered");
    Ok(DiscountDto::from(discount))
}

/// Deletes a discount code.
pub async fn remove_discount_code(db: &DbState, code: &str) -> Result<(), AppError> {
    debug!(code = %code, "remove_discount_code command");

    db.inner().discounts().delete(code).await?;

    info!(code = %code, "Discount deleted");
    Ok(())
}

/// Applies a discount code to the open sale.
///
/// ## Behavior
/// - Rejected on an empty cart (nothing to discount)
/// - Replaces any previously applied discount
pub async fn apply_discount(
    db: &DbState,
    cart: &CartState,
    code: &str,
) -> Result<CartResponse, AppError> {
    debug!(code = %code, "apply_discount command");

    if cart.with_cart(|c| c.is_empty()) {
        return Err(AppError::cart("Cannot apply a discount to an empty cart"));
    }

    let discount = db
        .inner()
        .discounts()
        .get_by_code(code)
        .await?
        .ok_or_else(|| AppError::not_found("Discount", code))?;

    info!(code = %discount.code, "Discount applied");

    Ok(cart.with_cart_mut(|c| {
        c.apply_discount(discount);
        CartResponse::from(&*c)
    }))
}

/// Removes the applied discount from the open sale.
pub fn remove_discount(cart: &CartState) -> CartResponse {
    debug!("remove_discount command");

    cart.with_cart_mut(|c| {
        c.remove_discount();
        CartResponse::from(&*c)
    })
}
