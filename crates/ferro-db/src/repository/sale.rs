//! # Sale Repository
//!
//! Database operations for committed sales and their lines.
//!
//! ## Commit Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Commit                                       │
//! │                                                                         │
//! │  BEGIN TRANSACTION                                                      │
//! │    INSERT sale row                                                      │
//! │    for each line:                                                       │
//! │      INSERT sale_items row (frozen product snapshot)                    │
//! │      UPDATE products stock = max(0, stock - quantity)                   │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Any failure rolls the whole commit back: no sale row, no stock         │
//! │  change. A crash mid-commit can never leave inventory partially         │
//! │  decremented.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ferro_core::{Sale, SaleLine};

const SALE_COLUMNS: &str = "id, customer_id, customer_name, discount_code, \
     subtotal_cents, discount_cents, total_cents, created_at";

const SALE_LINE_COLUMNS: &str = "id, sale_id, product_id, article_snapshot, name_snapshot, \
     unit_price_cents, quantity, line_total_cents";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Commits a sale: archives it with its lines and decrements stock,
    /// all in one transaction.
    ///
    /// ## Stock Clamping
    /// A line quantity larger than the remaining stock clamps the stock at
    /// zero instead of failing the sale; the shortfall is logged so the
    /// operator can reconcile the shelf count.
    ///
    /// ## Arguments
    /// * `sale` - The sale header (id and timestamp already assigned)
    /// * `lines` - One entry per cart line, snapshots frozen
    pub async fn commit(&self, sale: &Sale, lines: &[SaleLine]) -> DbResult<()> {
        debug!(id = %sale.id, lines = lines.len(), "Committing sale");

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO sales (
                id, customer_id, customer_name, discount_code,
                subtotal_cents, discount_cents, total_cents, created_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )
        .bind(&sale.id)
        .bind(&sale.customer_id)
        .bind(&sale.customer_name)
        .bind(&sale.discount_code)
        .bind(sale.subtotal_cents)
        .bind(sale.discount_cents)
        .bind(sale.total_cents)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        for line in lines {
            let stock: Option<i64> =
                sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
                    .bind(&line.product_id)
                    .fetch_optional(&mut *tx)
                    .await?;

            let stock = stock.ok_or_else(|| DbError::not_found("Product", &line.product_id))?;
            let new_stock = (stock - line.quantity).max(0);
            if stock < line.quantity {
                warn!(
                    product_id = %line.product_id,
                    article = %line.article_snapshot,
                    stock = %stock,
                    sold = %line.quantity,
                    shortfall = %(line.quantity - stock),
                    "Oversold: stock clamped at zero"
                );
            }

            sqlx::query(
                "UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1",
            )
            .bind(&line.product_id)
            .bind(new_stock)
            .bind(sale.created_at)
            .execute(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO sale_items (
                    id, sale_id, product_id, article_snapshot, name_snapshot,
                    unit_price_cents, quantity, line_total_cents
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )
            .bind(&line.id)
            .bind(&line.sale_id)
            .bind(&line.product_id)
            .bind(&line.article_snapshot)
            .bind(&line.name_snapshot)
            .bind(line.unit_price_cents)
            .bind(line.quantity)
            .bind(line.line_total_cents)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %sale.id, total = %sale.total_cents, lines = lines.len(), "Sale committed");
        Ok(())
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1");

        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }

    /// Gets all lines for a sale, in insertion order.
    pub async fn get_lines(&self, sale_id: &str) -> DbResult<Vec<SaleLine>> {
        let sql = format!(
            "SELECT {SALE_LINE_COLUMNS} FROM sale_items WHERE sale_id = ?1 ORDER BY rowid"
        );

        let lines = sqlx::query_as::<_, SaleLine>(&sql)
            .bind(sale_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales ORDER BY created_at DESC LIMIT ?1"
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Counts committed sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Generates a new sale ID.
pub fn generate_sale_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generates a new sale line ID.
pub fn generate_sale_line_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::repository::product::generate_product_id;
    use chrono::Utc;
    use ferro_core::Product;

    fn test_product(article: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            article_number: article.to_string(),
            name: format!("Product {}", article),
            description: None,
            category: "Tools".to_string(),
            price_cents,
            stock,
            min_stock: 5,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn sale_for(subtotal: i64, discount: i64) -> Sale {
        Sale {
            id: generate_sale_id(),
            customer_id: None,
            customer_name: None,
            discount_code: None,
            subtotal_cents: subtotal,
            discount_cents: discount,
            total_cents: subtotal - discount,
            created_at: Utc::now(),
        }
    }

    fn line_for(sale_id: &str, product: &Product, quantity: i64) -> SaleLine {
        SaleLine {
            id: generate_sale_line_id(),
            sale_id: sale_id.to_string(),
            product_id: product.id.clone(),
            article_snapshot: product.article_number.clone(),
            name_snapshot: product.name.clone(),
            unit_price_cents: product.price_cents,
            quantity,
            line_total_cents: product.price_cents * quantity,
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_commit_decrements_stock_and_archives_one_sale() {
        let db = test_db().await;

        let hammer = test_product("TOOL-001", 1250, 50);
        let screws = test_product("FAST-045", 599, 150);
        db.products().insert(&hammer).await.unwrap();
        db.products().insert(&screws).await.unwrap();

        let mut sale = sale_for(0, 0);
        let lines = vec![
            line_for(&sale.id, &hammer, 2),
            line_for(&sale.id, &screws, 10),
        ];
        sale.subtotal_cents = lines.iter().map(|l| l.line_total_cents).sum();
        sale.total_cents = sale.subtotal_cents;

        db.sales().commit(&sale, &lines).await.unwrap();

        // Exactly one history entry with both lines
        assert_eq!(db.sales().count().await.unwrap(), 1);
        let stored_lines = db.sales().get_lines(&sale.id).await.unwrap();
        assert_eq!(stored_lines.len(), 2);

        // Each product decremented by its line quantity
        let hammer_after = db.products().get_by_id(&hammer.id).await.unwrap().unwrap();
        assert_eq!(hammer_after.stock, 48);
        let screws_after = db.products().get_by_id(&screws.id).await.unwrap().unwrap();
        assert_eq!(screws_after.stock, 140);
    }

    #[tokio::test]
    async fn test_commit_clamps_oversold_stock_at_zero() {
        let db = test_db().await;

        let padlock = test_product("SEC-102", 2500, 3);
        db.products().insert(&padlock).await.unwrap();

        let mut sale = sale_for(0, 0);
        let lines = vec![line_for(&sale.id, &padlock, 5)];
        sale.subtotal_cents = lines[0].line_total_cents;
        sale.total_cents = sale.subtotal_cents;

        db.sales().commit(&sale, &lines).await.unwrap();

        let after = db.products().get_by_id(&padlock.id).await.unwrap().unwrap();
        assert_eq!(after.stock, 0);

        // The sale still records what was rung up
        let stored = db.sales().get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.subtotal_cents, 5 * 2500);
    }

    #[tokio::test]
    async fn test_failed_commit_rolls_back_everything() {
        let db = test_db().await;

        let hammer = test_product("TOOL-001", 1250, 50);
        db.products().insert(&hammer).await.unwrap();

        let ghost = test_product("GHOST-000", 100, 1); // never inserted

        let mut sale = sale_for(0, 0);
        let lines = vec![
            line_for(&sale.id, &hammer, 2),
            line_for(&sale.id, &ghost, 1),
        ];
        sale.subtotal_cents = lines.iter().map(|l| l.line_total_cents).sum();
        sale.total_cents = sale.subtotal_cents;

        let err = db.sales().commit(&sale, &lines).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // No sale row, no stock change
        assert_eq!(db.sales().count().await.unwrap(), 0);
        let hammer_after = db.products().get_by_id(&hammer.id).await.unwrap().unwrap();
        assert_eq!(hammer_after.stock, 50);
    }

    #[tokio::test]
    async fn test_list_recent_newest_first() {
        let db = test_db().await;

        let hammer = test_product("TOOL-001", 1250, 50);
        db.products().insert(&hammer).await.unwrap();

        for i in 0..3i64 {
            let mut sale = sale_for(0, 0);
            // Spread timestamps so ordering is deterministic
            sale.created_at = Utc::now() + chrono::Duration::seconds(i);
            let lines = vec![line_for(&sale.id, &hammer, 1)];
            sale.subtotal_cents = lines[0].line_total_cents;
            sale.total_cents = sale.subtotal_cents;
            db.sales().commit(&sale, &lines).await.unwrap();
        }

        let recent = db.sales().list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert!(recent[0].created_at >= recent[1].created_at);
    }
}
