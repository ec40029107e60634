//! # State Module
//!
//! Session state for the interactive shell.
//!
//! ## Why Multiple State Types?
//! Instead of a single `AppState` struct containing everything,
//! we use separate state types. This approach:
//!
//! 1. **Better Separation of Concerns**: Each state type has a single responsibility
//! 2. **Clearer Command Signatures**: Commands declare exactly what state they need
//! 3. **Easier Testing**: Can construct individual states in isolation
//!
//! ```text
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────────┐
//! │   DbState    │  │  CartState   │  │   ConfigState    │
//! │              │  │              │  │                  │
//! │  Database    │  │  Arc<Mutex<  │  │  store_name      │
//! │  (SQLite     │  │    Cart      │  │  currency        │
//! │   pool)      │  │  >>          │  │  credentials     │
//! └──────────────┘  └──────────────┘  └──────────────────┘
//! ```
//!
//! All three are built once at startup, at a single composition point in
//! `main`, and passed by reference into the shell.

mod cart;
mod config;
mod db;

pub use cart::CartState;
pub use config::ConfigState;
pub use db::DbState;
