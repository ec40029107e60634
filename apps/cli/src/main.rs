//! # Ferro POS Shell Entry Point
//!
//! ## Startup Sequence
//! 1. Parse process arguments
//! 2. Initialize tracing (logging)
//! 3. Determine database path (flag > FERRO_DB_PATH > app data directory)
//! 4. Connect to database & run migrations
//! 5. Optionally load the starter data (`--seed`)
//! 6. Create state objects (DbState, CartState, ConfigState)
//! 7. Enter the interactive shell

mod commands;
mod error;
mod shell;
mod state;

use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ferro_db::{seed_data, Database, DbConfig};
use shell::Shell;
use state::{CartState, ConfigState, DbState};

/// Point-of-sale shell for the hardware store.
#[derive(Debug, Parser)]
#[command(name = "ferro-pos", version, about)]
struct CliArgs {
    /// Database file path (defaults to the platform app data directory)
    #[arg(long, env = "FERRO_DB_PATH")]
    db: Option<PathBuf>,

    /// Override the configured store name
    #[arg(long)]
    store_name: Option<String>,

    /// Load the starter catalog/customers/discounts into an empty database
    #[arg(long)]
    seed: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    init_tracing();

    info!("Starting Ferro POS");

    let db_path = resolve_database_path(args.db)?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    if args.seed {
        let summary = seed_data::load(&db).await?;
        info!(
            products = summary.products,
            customers = summary.customers,
            discounts = summary.discounts,
            "Starter data loaded"
        );
    }

    // Single composition point: every service is built here and handed to
    // the shell by reference.
    let mut config = ConfigState::from_env();
    if let Some(store_name) = args.store_name {
        config.store_name = store_name;
    }
    let db_state = DbState::new(db);
    let cart_state = CartState::new();

    let shell = Shell::new(db_state, cart_state, config);
    shell.run().await?;

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=ferro=trace` - Show trace for ferro crates only
/// - Default: INFO level, sqlx chatter suppressed
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ferro=debug,sqlx=warn"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Determines the database file path.
///
/// ## Resolution Order
/// 1. `--db` flag / `FERRO_DB_PATH` environment variable
/// 2. Platform app data directory:
///    - **Linux**: `~/.local/share/ferro-pos/ferro.db`
///    - **macOS**: `~/Library/Application Support/com.ferro.pos/ferro.db`
///    - **Windows**: `%APPDATA%\ferro\pos\ferro.db`
fn resolve_database_path(
    override_path: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(path) = override_path {
        return Ok(path);
    }

    let proj_dirs =
        ProjectDirs::from("com", "ferro", "pos").ok_or("Could not determine app data directory")?;

    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)?;

    Ok(data_dir.join("ferro.db"))
}
