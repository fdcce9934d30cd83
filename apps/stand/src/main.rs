//! # Dolce Stand Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Dolce Stand                                      │
//! │                                                                         │
//! │  main.rs ─────► parse CLI, logging, config, database                    │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Controller ──► commands/ (product, cart, sale, config)                 │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  SQLite (dolce.db, kv_store table, WAL mode)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use dolce_stand::cli::{self, Cli};
use dolce_stand::services::description;
use dolce_stand::{open_database, AppConfig, Controller};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dolce_stand::init_tracing();

    // An explicit --config must load; the default location may be absent or broken
    let config = match cli.config.clone() {
        Some(path) => AppConfig::load(Some(path)).context("Failed to load configuration")?,
        None => AppConfig::load_or_default(None),
    };

    let db_path = match cli.db.clone() {
        Some(path) => path,
        None => config
            .database_path()
            .context("Could not determine database path")?,
    };

    let db = open_database(&db_path)
        .await
        .with_context(|| format!("Failed to open database {}", db_path.display()))?;

    let generator = description::from_settings(&config.genai);
    let mut controller =
        Controller::load(Arc::new(db.store()), generator, config.store.default_rate).await;

    let result = cli::execute(&mut controller, cli.command, &config.store.name, &chrono::Local).await;
    db.close().await;

    let output = result?;
    println!("{}", output);
    info!("Done");
    Ok(())
}
