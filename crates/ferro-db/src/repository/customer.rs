//! # Customer Repository
//!
//! Database operations for the customer register.
//!
//! Lookup supports the register flow: the operator types either an exact
//! customer id or part of a name, and the first match gets attached to the
//! open sale.

use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use ferro_core::Customer;

const CUSTOMER_COLUMNS: &str = "id, name, phone, email, address, created_at";

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1");

        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    /// Lists all customers sorted by name.
    pub async fn list(&self, limit: u32) -> DbResult<Vec<Customer>> {
        let sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name LIMIT ?1");

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Searches customers by name (case-insensitive contains).
    pub async fn search_by_name(&self, name: &str, limit: u32) -> DbResult<Vec<Customer>> {
        let pattern = format!("%{}%", name.trim());
        let sql = format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE name LIKE ?1 ORDER BY name LIMIT ?2"
        );

        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(&pattern)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(customers)
    }

    /// Finds a single customer by id or name fragment.
    ///
    /// ## Behavior
    /// Input that parses as a UUID tries an exact id lookup first;
    /// otherwise (or on a miss) the first name match wins. Used by the
    /// register to attach a customer to the open sale.
    pub async fn find(&self, query: &str) -> DbResult<Option<Customer>> {
        let query = query.trim();
        debug!(query = %query, "Finding customer");

        if Uuid::parse_str(query).is_ok() {
            if let Some(customer) = self.get_by_id(query).await? {
                return Ok(Some(customer));
            }
        }

        let matches = self.search_by_name(query, 1).await?;
        Ok(matches.into_iter().next())
    }

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(name = %customer.name, "Inserting customer");

        sqlx::query(
            "INSERT INTO customers (id, name, phone, email, address, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .bind(customer.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates an existing customer.
    pub async fn update(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Updating customer");

        let result = sqlx::query(
            "UPDATE customers SET name = ?2, phone = ?3, email = ?4, address = ?5 WHERE id = ?1",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.address)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", &customer.id));
        }

        Ok(())
    }

    /// Deletes a customer.
    ///
    /// Committed sales keep their frozen customer name, so removing the
    /// register entry does not damage history.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting customer");

        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }

        Ok(())
    }

    /// Counts customers (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Helper to generate a new customer ID.
pub fn generate_customer_id() -> String {
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

    fn test_customer(name: &str) -> Customer {
        Customer {
            id: generate_customer_id(),
            name: name.to_string(),
            phone: "5512345678".to_string(),
            email: format!("{}@mail.com", name.to_lowercase().replace(' ', ".")),
            address: "123 Main St".to_string(),
            created_at: Utc::now(),
        }
    }

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_list_and_count() {
        let db = test_db().await;
        let repo = db.customers();

        repo.insert(&test_customer("Ana Gomez")).await.unwrap();
        repo.insert(&test_customer("Juan Perez")).await.unwrap();

        let all = repo.list(50).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].name, "Ana Gomez"); // sorted by name
        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_by_id_and_name() {
        let db = test_db().await;
        let repo = db.customers();

        let ana = test_customer("Ana Gomez");
        repo.insert(&ana).await.unwrap();

        let by_id = repo.find(&ana.id).await.unwrap().unwrap();
        assert_eq!(by_id.name, "Ana Gomez");

        let by_name = repo.find("gomez").await.unwrap().unwrap();
        assert_eq!(by_name.id, ana.id);

        assert!(repo.find("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        let repo = db.customers();

        let mut ana = test_customer("Ana Gomez");
        repo.insert(&ana).await.unwrap();

        ana.phone = "5598765432".to_string();
        repo.update(&ana).await.unwrap();

        let found = repo.get_by_id(&ana.id).await.unwrap().unwrap();
        assert_eq!(found.phone, "5598765432");

        repo.delete(&ana.id).await.unwrap();
        assert!(repo.get_by_id(&ana.id).await.unwrap().is_none());

        let err = repo.delete(&ana.id).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
