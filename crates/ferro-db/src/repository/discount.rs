//! # Discount Repository
//!
//! Database operations for discount codes.
//!
//! Codes are the primary key and are stored uppercase; lookups normalize
//! their input the same way, so "promo25" finds "PROMO25".

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use ferro_core::Discount;

const DISCOUNT_COLUMNS: &str = "code, kind, value, description";

/// Repository for discount database operations.
#[derive(Debug, Clone)]
pub struct DiscountRepository {
    pool: SqlitePool,
}

impl DiscountRepository {
    /// Creates a new DiscountRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DiscountRepository { pool }
    }

    /// Gets a discount by its code (input normalized to uppercase).
    pub async fn get_by_code(&self, code: &str) -> DbResult<Option<Discount>> {
        let code = code.trim().to_uppercase();
        let sql = format!("SELECT {DISCOUNT_COLUMNS} FROM discounts WHERE code = ?1");

        let discount = sqlx::query_as::<_, Discount>(&sql)
            .bind(&code)
            .fetch_optional(&self.pool)
            .await?;

        Ok(discount)
    }

    /// Lists all discounts sorted by code.
    pub async fn list(&self) -> DbResult<Vec<Discount>> {
        let sql = format!("SELECT {DISCOUNT_COLUMNS} FROM discounts ORDER BY code");

        let discounts = sqlx::query_as::<_, Discount>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(discounts)
    }

    /// Inserts a new discount.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - code already exists
    pub async fn insert(&self, discount: &Discount) -> DbResult<()> {
        debug!(code = %discount.code, "Inserting discount");

        sqlx::query(
            "INSERT INTO discounts (code, kind, value, description) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&discount.code)
        .bind(discount.kind)
        .bind(discount.value)
        .bind(&discount.description)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Deletes a discount by code.
    pub async fn delete(&self, code: &str) -> DbResult<()> {
        let code = code.trim().to_uppercase();
        debug!(code = %code, "Deleting discount");

        let result = sqlx::query("DELETE FROM discounts WHERE code = ?1")
            .bind(&code)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Discount", &code));
        }

        Ok(())
    }

    /// Counts discounts (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM discounts")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use ferro_core::DiscountKind;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_get_normalizes_code() {
        let db = test_db().await;
        let repo = db.discounts();

        let promo = Discount::new("PROMO25", DiscountKind::Percentage, 2500, "Season promo: 25%");
        repo.insert(&promo).await.unwrap();

        let found = repo.get_by_code("promo25").await.unwrap().unwrap();
        assert_eq!(found.code, "PROMO25");
        assert_eq!(found.kind, DiscountKind::Percentage);
        assert_eq!(found.value, 2500);
    }

    #[tokio::test]
    async fn test_kind_round_trips_through_text_column() {
        let db = test_db().await;
        let repo = db.discounts();

        let fixed = Discount::new("FIX50", DiscountKind::FixedAmount, 5000, "Fixed $50 off");
        repo.insert(&fixed).await.unwrap();

        let found = repo.get_by_code("FIX50").await.unwrap().unwrap();
        assert_eq!(found.kind, DiscountKind::FixedAmount);
    }

    #[tokio::test]
    async fn test_duplicate_code_rejected() {
        let db = test_db().await;
        let repo = db.discounts();

        let d = Discount::new("TOTAL10", DiscountKind::Percentage, 1000, "10% off");
        repo.insert(&d).await.unwrap();

        let err = repo.insert(&d).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let db = test_db().await;
        let repo = db.discounts();

        repo.insert(&Discount::new(
            "TOTAL10",
            DiscountKind::Percentage,
            1000,
            "10% off",
        ))
        .await
        .unwrap();
        repo.insert(&Discount::new(
            "FIX50",
            DiscountKind::FixedAmount,
            5000,
            "Fixed $50 off",
        ))
        .await
        .unwrap();

        assert_eq!(repo.list().await.unwrap().len(), 2);

        repo.delete("total10").await.unwrap();
        assert_eq!(repo.count().await.unwrap(), 1);
    }
}
