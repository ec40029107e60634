//! # Database State
//!
//! Wraps the `Database` connection for use in shell commands.
//!
//! The `Database` struct from `ferro-db` contains a `SqlitePool` which is
//! inherently thread-safe; no extra locking here.

use ferro_db::Database;

/// Wrapper around `Database` for session state.
///
/// ## Why a Wrapper?
/// Keeps the command signatures uniform (every command takes state types
/// from this module) and leaves room for per-session database bookkeeping.
#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let products = db_state.inner().products().search("query", 20).await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
