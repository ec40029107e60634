//! # Starter Data
//!
//! The hardware-store starter dataset: four catalog products, two
//! customers, and three discount codes. Loaded by the `seed` binary and
//! reused by tests that want a populated store.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::error::DbResult;
use crate::pool::Database;
use ferro_core::{Customer, Discount, DiscountKind, Product, DEFAULT_MIN_STOCK};

/// Summary of what a seed run inserted (zeros when a table was skipped).
#[derive(Debug, Clone, Copy, Default)]
pub struct SeedSummary {
    pub products: usize,
    pub customers: usize,
    pub discounts: usize,
}

/// The starter catalog.
///
/// (article_number, name, description, category, price_cents, stock)
const STARTER_PRODUCTS: &[(&str, &str, &str, &str, i64, i64)] = &[
    (
        "TOOL-001",
        "Claw Hammer",
        "Forged steel head",
        "Tools",
        1250,
        50,
    ),
    (
        "FAST-045",
        "Screw Box M5",
        "Stainless steel, 200 pieces",
        "Fasteners",
        599,
        150,
    ),
    (
        "SEC-102",
        "Security Padlock",
        "High resistance shackle",
        "Security",
        2500,
        3,
    ),
    (
        "PLM-301",
        "PVC Pipe 1/2in",
        "Pressure resistant",
        "Plumbing",
        350,
        15,
    ),
];

/// The starter customer register: (name, phone, email, address).
const STARTER_CUSTOMERS: &[(&str, &str, &str, &str)] = &[
    (
        "Juan Perez",
        "5512345678",
        "juan.perez@mail.com",
        "269 Elm Street",
    ),
    (
        "Ana Gomez",
        "5598765432",
        "ana.gomez@mail.com",
        "345 Oak Avenue",
    ),
];

/// Builds the starter product list with fresh ids and timestamps.
pub fn starter_products() -> Vec<Product> {
    let now = Utc::now();
    STARTER_PRODUCTS
        .iter()
        .map(
            |&(article, name, description, category, price_cents, stock)| Product {
                id: Uuid::new_v4().to_string(),
                article_number: article.to_string(),
                name: name.to_string(),
                description: Some(description.to_string()),
                category: category.to_string(),
                price_cents,
                stock,
                min_stock: DEFAULT_MIN_STOCK,
                is_active: true,
                created_at: now,
                updated_at: now,
            },
        )
        .collect()
}

/// Builds the starter customer list with fresh ids.
pub fn starter_customers() -> Vec<Customer> {
    let now = Utc::now();
    STARTER_CUSTOMERS
        .iter()
        .map(|&(name, phone, email, address)| Customer {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            phone: phone.to_string(),
            email: email.to_string(),
            address: address.to_string(),
            created_at: now,
        })
        .collect()
}

/// Builds the starter discount codes.
pub fn starter_discounts() -> Vec<Discount> {
    vec![
        Discount::new(
            "TOTAL10",
            DiscountKind::Percentage,
            1000,
            "10% off the sale total",
        ),
        Discount::new("FIX50", DiscountKind::FixedAmount, 5000, "Fixed $50.00 off"),
        Discount::new(
            "PROMO25",
            DiscountKind::Percentage,
            2500,
            "Season promotion: 25%",
        ),
    ]
}

/// Loads the starter data into an empty database.
///
/// ## Idempotence
/// Each table is skipped if it already has rows, so running the seed twice
/// never duplicates data.
pub async fn load(db: &Database) -> DbResult<SeedSummary> {
    let mut summary = SeedSummary::default();

    if db.products().count().await? == 0 {
        for product in starter_products() {
            db.products().insert(&product).await?;
            summary.products += 1;
        }
        info!(count = summary.products, "Seeded starter products");
    }

    if db.customers().count().await? == 0 {
        for customer in starter_customers() {
            db.customers().insert(&customer).await?;
            summary.customers += 1;
        }
        info!(count = summary.customers, "Seeded starter customers");
    }

    if db.discounts().count().await? == 0 {
        for discount in starter_discounts() {
            db.discounts().insert(&discount).await?;
            summary.discounts += 1;
        }
        info!(count = summary.discounts, "Seeded starter discounts");
    }

    Ok(summary)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_load_populates_empty_database() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let summary = load(&db).await.unwrap();
        assert_eq!(summary.products, 4);
        assert_eq!(summary.customers, 2);
        assert_eq!(summary.discounts, 3);

        // The padlock ships below its minimum and must show as an alert
        let alerts = db.products().restock_alerts().await.unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].article_number, "SEC-102");
    }

    #[tokio::test]
    async fn test_load_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        load(&db).await.unwrap();
        let second = load(&db).await.unwrap();

        assert_eq!(second.products, 0);
        assert_eq!(second.customers, 0);
        assert_eq!(second.discounts, 0);
        assert_eq!(db.products().count().await.unwrap(), 4);
    }
}
