//! # Product Repository
//!
//! Database operations for the hardware catalog.
//!
//! ## Key Operations
//! - CRUD with soft delete
//! - LIKE search over name, article number, and category
//! - Stock adjustments (clamped at zero)
//! - Restock alerts (stock below the product's minimum)
//!
//! Queries are bound at runtime and decoded through `FromRow`; the schema
//! lives in `migrations/sqlite` and is exercised by the tests below.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ferro_core::Product;

/// Columns selected for every product query, in `Product` field order.
const PRODUCT_COLUMNS: &str = "id, article_number, name, description, category, \
     price_cents, stock, min_stock, is_active, created_at, updated_at";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// let results = repo.search("hammer", 20).await?;
/// let product = repo.get_by_article_number("TOOL-001").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Searches active products by name, article number, or category.
    ///
    /// ## How It Works
    /// Case-insensitive LIKE over the three text columns. An empty query
    /// returns the active listing sorted by name.
    ///
    /// ## Arguments
    /// * `query` - Search term (can be partial)
    /// * `limit` - Maximum results to return
    pub async fn search(&self, query: &str, limit: u32) -> DbResult<Vec<Product>> {
        let query = query.trim();

        debug!(query = %query, limit = %limit, "Searching products");

        if query.is_empty() {
            return self.list_active(limit).await;
        }

        let pattern = format!("%{}%", query);

        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE is_active = 1
               AND (name LIKE ?1 OR article_number LIKE ?1 OR category LIKE ?1)
             ORDER BY name
             LIMIT ?2"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(&pattern)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = products.len(), "Search returned products");
        Ok(products)
    }

    /// Lists active products sorted by name.
    pub async fn list_active(&self, limit: u32) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE is_active = 1
             ORDER BY name
             LIMIT ?1"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Gets a product by its article number (e.g., "TOOL-001").
    pub async fn get_by_article_number(&self, article: &str) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE article_number = ?1");

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(article)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - article number already exists
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(article = %product.article_number, "Inserting product");

        sqlx::query(
            "INSERT INTO products (
                id, article_number, name, description, category,
                price_cents, stock, min_stock, is_active, created_at, updated_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&product.id)
        .bind(&product.article_number)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing product.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    pub async fn update(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Updating product");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE products SET
                article_number = ?2,
                name = ?3,
                description = ?4,
                category = ?5,
                price_cents = ?6,
                stock = ?7,
                min_stock = ?8,
                is_active = ?9,
                updated_at = ?10
             WHERE id = ?1",
        )
        .bind(&product.id)
        .bind(&product.article_number)
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.category)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.min_stock)
        .bind(product.is_active)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", &product.id));
        }

        Ok(())
    }

    /// Adjusts the stock level by a delta, clamping at zero.
    ///
    /// ## Arguments
    /// * `id` - Product ID
    /// * `delta` - Change in stock (negative for sales/corrections,
    ///   positive for restocking)
    ///
    /// A delta that would take the stock below zero clamps at zero and
    /// logs a warning with the shortfall.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> DbResult<()> {
        debug!(id = %id, delta = %delta, "Adjusting stock");

        let now = Utc::now();

        let stock: Option<i64> = sqlx::query_scalar("SELECT stock FROM products WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let stock = stock.ok_or_else(|| DbError::not_found("Product", id))?;
        let new_stock = (stock + delta).max(0);
        if stock + delta < 0 {
            warn!(
                id = %id,
                stock = %stock,
                delta = %delta,
                shortfall = %(-(stock + delta)),
                "Stock adjustment clamped at zero"
            );
        }

        sqlx::query("UPDATE products SET stock = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(new_stock)
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Lists active products whose stock has fallen below their minimum.
    pub async fn restock_alerts(&self) -> DbResult<Vec<Product>> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS}
             FROM products
             WHERE is_active = 1 AND stock < min_stock
             ORDER BY stock ASC"
        );

        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Soft-deletes a product by setting is_active = false.
    ///
    /// ## Why Soft Delete?
    /// Historical sale lines reference this product; the row must remain
    /// so history stays renderable. Can be restored if deleted by mistake.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting product");

        let now = Utc::now();

        let result = sqlx::query("UPDATE products SET is_active = 0, updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(now)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Counts active products (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new product ID.
pub fn generate_product_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Utc;

    fn test_product(article: &str, name: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: generate_product_id(),
            article_number: article.to_string(),
            name: name.to_string(),
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

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let db = test_db().await;
        let repo = db.products();

        let product = test_product("TOOL-001", "Claw Hammer", 1250, 50);
        repo.insert(&product).await.unwrap();

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.name, "Claw Hammer");
        assert_eq!(found.price_cents, 1250);

        let by_article = repo
            .get_by_article_number("TOOL-001")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(by_article.id, product.id);
    }

    #[tokio::test]
    async fn test_duplicate_article_number_rejected() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&test_product("TOOL-001", "Claw Hammer", 1250, 50))
            .await
            .unwrap();

        let err = repo
            .insert(&test_product("TOOL-001", "Other Hammer", 999, 10))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_search_matches_name_article_and_category() {
        let db = test_db().await;
        let repo = db.products();

        repo.insert(&test_product("TOOL-001", "Claw Hammer", 1250, 50))
            .await
            .unwrap();
        repo.insert(&test_product("FAST-045", "Screw Box M5", 599, 150))
            .await
            .unwrap();

        let by_name = repo.search("hammer", 20).await.unwrap();
        assert_eq!(by_name.len(), 1);

        let by_article = repo.search("FAST-045", 20).await.unwrap();
        assert_eq!(by_article.len(), 1);

        let by_category = repo.search("Tools", 20).await.unwrap();
        assert_eq!(by_category.len(), 2);

        let all = repo.search("", 20).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_adjust_stock_clamps_at_zero() {
        let db = test_db().await;
        let repo = db.products();

        let product = test_product("SEC-102", "Security Padlock", 2500, 3);
        repo.insert(&product).await.unwrap();

        repo.adjust_stock(&product.id, -10).await.unwrap();

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.stock, 0);
    }

    #[tokio::test]
    async fn test_adjust_stock_restock() {
        let db = test_db().await;
        let repo = db.products();

        let product = test_product("PLM-301", "PVC Pipe 1/2in", 350, 15);
        repo.insert(&product).await.unwrap();

        repo.adjust_stock(&product.id, 25).await.unwrap();

        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert_eq!(found.stock, 40);
    }

    #[tokio::test]
    async fn test_restock_alerts() {
        let db = test_db().await;
        let repo = db.products();

        // Below the default minimum of 5
        repo.insert(&test_product("SEC-102", "Security Padlock", 2500, 3))
            .await
            .unwrap();
        repo.insert(&test_product("TOOL-001", "Claw Hammer", 1250, 50))
            .await
            .unwrap();

        let alerts = repo.restock_alerts().await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].article_number, "SEC-102");
    }

    #[tokio::test]
    async fn test_soft_delete_hides_from_search() {
        let db = test_db().await;
        let repo = db.products();

        let product = test_product("TOOL-001", "Claw Hammer", 1250, 50);
        repo.insert(&product).await.unwrap();
        repo.soft_delete(&product.id).await.unwrap();

        assert!(repo.search("hammer", 20).await.unwrap().is_empty());
        assert_eq!(repo.count().await.unwrap(), 0);

        // Still reachable by id for history rendering
        let found = repo.get_by_id(&product.id).await.unwrap().unwrap();
        assert!(!found.is_active);
    }

    #[tokio::test]
    async fn test_update_missing_product_errors() {
        let db = test_db().await;
        let repo = db.products();

        let ghost = test_product("NOPE-000", "Ghost", 100, 1);
        let err = repo.update(&ghost).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
