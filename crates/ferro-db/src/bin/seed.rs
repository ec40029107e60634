//! # Seed Data Loader
//!
//! Populates the database with the hardware-store starter data.
//!
//! ## Usage
//! ```bash
//! cargo run -p ferro-db --bin seed
//!
//! # Specify database path
//! cargo run -p ferro-db --bin seed -- --db ./data/ferro.db
//! ```
//!
//! Loads four catalog products, two customers, and three discount codes.
//! Tables that already contain rows are left untouched.

use std::env;

use ferro_db::{seed_data, Database, DbConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./ferro_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Ferro POS Seed Data Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./ferro_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("Ferro POS Seed Data Loader");
    println!("==========================");
    println!("Database: {}", db_path);
    println!();

    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");
    println!();

    let summary = seed_data::load(&db).await?;

    if summary.products == 0 && summary.customers == 0 && summary.discounts == 0 {
        println!("⚠ Database already contains data; nothing inserted.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    println!("✓ Inserted {} products", summary.products);
    println!("✓ Inserted {} customers", summary.customers);
    println!("✓ Inserted {} discounts", summary.discounts);
    println!();

    // Quick sanity pass over the freshly seeded store
    let results = db.products().search("hammer", 10).await?;
    println!("Search 'hammer': {} result(s)", results.len());
    let alerts = db.products().restock_alerts().await?;
    println!("Restock alerts: {} product(s)", alerts.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
