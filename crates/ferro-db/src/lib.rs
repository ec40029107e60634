//! # ferro-db: Database Layer for Ferro POS
//!
//! This crate provides database access for the Ferro POS system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ferro POS Data Flow                              │
//! │                                                                         │
//! │  Shell command (product search, checkout, ...)                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     ferro-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐   │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │   │   │
//! │  │   │   (pool.rs)   │    │ (repository/) │    │  (embedded)  │   │   │
//! │  │   │               │    │               │    │              │   │   │
//! │  │   │ SqlitePool    │    │ ProductRepo   │    │ 001_init.sql │   │   │
//! │  │   │ Connection    │◄───│ CustomerRepo  │    │              │   │   │
//! │  │   │ Management    │    │ DiscountRepo  │    │              │   │   │
//! │  │   │               │    │ SaleRepo      │    │              │   │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘   │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database file (WAL mode)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ferro_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/ferro.db")).await?;
//! let products = db.products().search("hammer", 20).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod seed_data;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::discount::DiscountRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
