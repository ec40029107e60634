//! # Repository Module
//!
//! Database repository implementations for Ferro POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Shell command                                                          │
//! │       │                                                                 │
//! │       │  db.products().search("hammer", 20)                             │
//! │       ▼                                                                 │
//! │  ProductRepository                                                      │
//! │  ├── search(&self, query, limit)                                        │
//! │  ├── get_by_id(&self, id)                                               │
//! │  ├── insert(&self, product)                                             │
//! │  └── adjust_stock(&self, id, delta)                                     │
//! │       │                                                                 │
//! │       │  SQL query                                                      │
//! │       ▼                                                                 │
//! │  SQLite database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                         │
//! │  • Clean separation of concerns                                         │
//! │  • Easy to test against an in-memory database                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD, search, stock
//! - [`customer::CustomerRepository`] - Customer CRUD and lookup
//! - [`discount::DiscountRepository`] - Discount codes
//! - [`sale::SaleRepository`] - Sale commit and history

pub mod customer;
pub mod discount;
pub mod product;
pub mod sale;
