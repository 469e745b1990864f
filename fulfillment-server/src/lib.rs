//! Atelier Fulfillment Server - order pipeline and financial reconciliation
//!
//! # Architecture overview
//!
//! This crate is the fulfillment server's main entry point, providing:
//!
//! - **Fulfillment engine** (`fulfillment`): status transitions, ledger
//!   bookkeeping, board view, document numbering, quotes
//! - **Storage** (`fulfillment::storage`): embedded redb database
//! - **HTTP API** (`api`): RESTful API surface
//! - **Events**: tokio broadcast channel of fulfillment events
//!
//! # Module structure
//!
//! ```text
//! fulfillment-server/src/
//! ├── core/          # Configuration, state, server
//! ├── api/           # HTTP routes and handlers
//! ├── fulfillment/   # Engine, transitions, ledger, board, storage
//! └── utils/         # Logging, shared error re-exports
//! ```

pub mod api;
pub mod core;
pub mod fulfillment;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use fulfillment::{Engine, FulfillmentStorage, FulfillmentStore, TransitionController};
pub use utils::{AppError, AppResult};

// Re-export unified error types from shared
pub use utils::{ApiResponse, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// Prepare the process environment: dotenv, then logging
///
/// Reads `LOG_LEVEL` and `LOG_DIR` before [`Config::from_env`] so startup
/// problems are already logged.
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
    ___   ______    ______    __        ____    ______    ____
   /   | /_  __/   / ____/   / /       /  _/   / ____/   / __ \
  / /| |  / /     / __/     / /        / /    / __/     / /_/ /
 / ___ | / /     / /___    / /___    _/ /    / /___    / _, _/
/_/  |_|/_/     /_____/   /_____/   /___/   /_____/   /_/ |_|
                                            fulfillment server
    "#
    );
}
