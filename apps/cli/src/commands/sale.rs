//! # Sale Commands

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::{CartState, ConfigState, DbState};
use ferro_core::{CoreError, Sale, SaleLine};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub sale_id: String,
    pub store_name: String,
    pub timestamp: String,
    pub customer_name: Option<String>,
    pub discount_code: Option<String>,
    pub lines: Vec<ReceiptLine>,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    pub article_number: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleSummary {
    pub sale_id: String,
    pub timestamp: String,
    pub customer_name: Option<String>,
    pub discount_code: Option<String>,
    pub total_cents: i64,
}

/// Commits the open sale.
///
/// ## What This Does
/// 1. Rejects an empty cart (inventory and history untouched)
/// 2. Freezes the cart into a sale with id and timestamp
/// 3. Persists sale + lines and decrements stock in one transaction
/// 4. Replaces the cart with a fresh empty one
pub async fn checkout(
    db: &DbState,
    cart: &CartState,
    config: &ConfigState,
) -> Result<Receipt, AppError> {
    debug!("checkout command");

    let snapshot = cart.with_cart(|c| c.clone());

    if snapshot.is_empty() {
        warn!("Checkout rejected: cart is empty");
        return Err(CoreError::EmptyCart.into());
    }

    let totals = snapshot.totals();
    let sale_id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let sale = Sale {
        id: sale_id.clone(),
        customer_id: snapshot.customer.as_ref().map(|c| c.id.clone()),
        customer_name: snapshot.customer.as_ref().map(|c| c.name.clone()),
        discount_code: snapshot.discount.as_ref().map(|d| d.code.clone()),
        subtotal_cents: totals.subtotal_cents,
        discount_cents: totals.discount_cents,
        total_cents: totals.total_cents,
        created_at: now,
    };

    let lines: Vec<SaleLine> = snapshot
        .lines
        .iter()
        .map(|l| SaleLine {
            id: Uuid::new_v4().to_string(),
            sale_id: sale_id.clone(),
            product_id: l.product_id.clone(),
            article_snapshot: l.article_number.clone(),
            name_snapshot: l.name.clone(),
            unit_price_cents: l.unit_price_cents,
            quantity: l.quantity,
            line_total_cents: l.line_total_cents(),
        })
        .collect();

    db.inner().sales().commit(&sale, &lines).await?;

    // The committed cart is replaced by a fresh empty one
    cart.with_cart_mut(|c| c.clear());

    info!(sale_id = %sale_id, total = %totals.total_cents, lines = lines.len(), "Sale registered");

    Ok(Receipt {
        sale_id: sale.id,
        store_name: config.store_name.clone(),
        timestamp: sale.created_at.to_rfc3339(),
        customer_name: sale.customer_name,
        discount_code: sale.discount_code,
        lines: lines
            .into_iter()
            .map(|l| ReceiptLine {
                article_number: l.article_snapshot,
                name: l.name_snapshot,
                quantity: l.quantity,
                unit_price_cents: l.unit_price_cents,
                line_total_cents: l.line_total_cents,
            })
            .collect(),
        subtotal_cents: sale.subtotal_cents,
        discount_cents: sale.discount_cents,
        total_cents: sale.total_cents,
    })
}

/// Lists the most recent committed sales, newest first.
pub async fn history(db: &DbState, limit: Option<u32>) -> Result<Vec<SaleSummary>, AppError> {
    let limit = limit.unwrap_or(10).min(100);
    debug!(limit = %limit, "history command");

    let sales = db.inner().sales().list_recent(limit).await?;

    Ok(sales
        .into_iter()
        .map(|s| SaleSummary {
            sale_id: s.id,
            timestamp: s.created_at.to_rfc3339(),
            customer_name: s.customer_name,
            discount_code: s.discount_code,
            total_cents: s.total_cents,
        })
        .collect())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{cart as cart_cmd, discount as discount_cmd};
    use crate::error::ErrorCode;
    use crate::state::{CartState, ConfigState, DbState};
    use ferro_db::{seed_data, Database, DbConfig};

    /// Builds a session over a freshly seeded in-memory store.
    async fn test_state() -> (DbState, CartState, ConfigState) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        seed_data::load(&db).await.unwrap();
        (DbState::new(db), CartState::new(), ConfigState::default())
    }

    #[tokio::test]
    async fn test_checkout_empty_cart_rejected_and_inventory_untouched() {
        let (db, cart, config) = test_state().await;

        let err = checkout(&db, &cart, &config).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BusinessLogic);

        let hammer = db
            .inner()
            .products()
            .get_by_article_number("TOOL-001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hammer.stock, 50);
        assert_eq!(db.inner().sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_checkout_commits_decrements_and_resets_cart() {
        let (db, cart, config) = test_state().await;

        cart_cmd::add_to_cart(&db, &cart, "TOOL-001", Some(2))
            .await
            .unwrap();
        cart_cmd::add_to_cart(&db, &cart, "FAST-045", Some(10))
            .await
            .unwrap();
        discount_cmd::apply_discount(&db, &cart, "total10")
            .await
            .unwrap();

        let receipt = checkout(&db, &cart, &config).await.unwrap();

        // 2 × 1250 + 10 × 599 = 8490, minus 10% = 849
        assert_eq!(receipt.subtotal_cents, 8490);
        assert_eq!(receipt.discount_cents, 849);
        assert_eq!(receipt.total_cents, 7641);
        assert_eq!(receipt.lines.len(), 2);

        let hammer = db
            .inner()
            .products()
            .get_by_article_number("TOOL-001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(hammer.stock, 48);
        let screws = db
            .inner()
            .products()
            .get_by_article_number("FAST-045")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(screws.stock, 140);

        // Exactly one archived sale; the cart was replaced by a fresh one
        assert_eq!(db.inner().sales().count().await.unwrap(), 1);
        assert!(cart.with_cart(|c| c.is_empty()));

        let recent = history(&db, None).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].total_cents, 7641);
    }

    #[tokio::test]
    async fn test_checkout_with_customer_freezes_attribution() {
        let (db, cart, config) = test_state().await;

        cart_cmd::add_to_cart(&db, &cart, "PLM-301", Some(4))
            .await
            .unwrap();
        cart_cmd::assign_customer(&db, &cart, "gomez").await.unwrap();

        let receipt = checkout(&db, &cart, &config).await.unwrap();
        assert_eq!(receipt.customer_name.as_deref(), Some("Ana Gomez"));

        let stored = db
            .inner()
            .sales()
            .get_by_id(&receipt.sale_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.customer_name.as_deref(), Some("Ana Gomez"));
    }
}
