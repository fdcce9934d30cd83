//! # Dolce Stand Library
//!
//! Application shell for the Dolce Fusión stand: configuration, logging, the
//! controller that owns the running state, and the command line.
//!
//! ## Module Organization
//! ```text
//! dolce_stand/
//! ├── lib.rs          ◄─── You are here (startup helpers)
//! ├── config.rs       ◄─── AppConfig (TOML + environment)
//! ├── controller.rs   ◄─── Controller: state owner + persistence
//! ├── state/
//! │   ├── mod.rs      ◄─── AppState
//! │   ├── view.rs     ◄─── View (five screens)
//! │   └── editor.rs   ◄─── ProductEditor (form + ticket)
//! ├── commands/
//! │   ├── product.rs  ◄─── Product form and descriptions
//! │   ├── cart.rs     ◄─── Cart and checkout
//! │   ├── sale.rs     ◄─── History and daily close
//! │   └── config.rs   ◄─── Rate, logo, calculator
//! ├── services/
//! │   └── description.rs ◄── DescriptionGenerator (Gemini / disabled)
//! ├── report.rs       ◄─── Printable daily close
//! ├── cli.rs          ◄─── clap command line
//! └── error.rs        ◄─── ApiError for commands
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Parse command line ───────────────────────────────────────────────► │
//! │  2. Initialize Logging (RUST_LOG, default info,dolce=debug,sqlx=warn) ► │
//! │  3. Load AppConfig (defaults → stand.toml → environment) ─────────────► │
//! │  4. Determine Database Path                                             │
//! │     --db  >  DOLCE_DB_PATH  >  [database].path  >  data dir/dolce.db   │
//! │  5. Connect to Database (WAL mode, run migrations) ───────────────────► │
//! │  6. Load Controller (catalog, ledger, rate, logo; defaults on error) ─► │
//! │  7. Execute the command and print its output ─────────────────────────► │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod controller;
pub mod error;
pub mod report;
pub mod services;
pub mod state;

pub use config::AppConfig;
pub use controller::Controller;
pub use error::{ApiError, ApiResult, ErrorCode};

use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

use dolce_db::{Database, DbConfig};

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so command output stays clean on stdout.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=dolce=trace` - Show trace for dolce crates only
/// - Default: `info,dolce=debug,sqlx=warn`
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dolce=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Opens the SQLite file and applies pending migrations.
pub async fn open_database(path: &Path) -> ApiResult<Database> {
    info!(?path, "Opening database");
    let db = Database::new(DbConfig::new(path)).await?;
    info!("Database connected and migrations applied");
    Ok(db)
}
