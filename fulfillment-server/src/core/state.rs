use std::path::PathBuf;
use std::sync::Arc;

use crate::core::Config;
use crate::fulfillment::{Engine, FulfillmentStorage, FulfillmentStore};
use crate::utils::{AppError, AppResult};

/// Shared server state
///
/// ServerState holds the handles every request handler needs. Cloning is
/// cheap: the engine sits behind an Arc, the config is a plain value.
///
/// # Components
///
/// | Field | Type | Description |
/// |-------|------|-------------|
/// | config | Config | Server configuration (immutable) |
/// | engine | Arc<Engine> | Fulfillment engine (orders, board, ledger, quotes) |
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Fulfillment engine
    pub engine: Arc<Engine>,
}

impl ServerState {
    /// Initialize the server state
    ///
    /// In order:
    /// 1. Ensure the working directory exists
    /// 2. Open the embedded database (work_dir/fulfillment.redb)
    /// 3. Build the engine (seeds document counters, loads the board)
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config.ensure_work_dir().map_err(|e| {
            AppError::internal(format!("Failed to create work directory: {}", e))
        })?;

        let db_path = config.db_path();
        let storage = FulfillmentStorage::open(&db_path)?;
        let store: Arc<dyn FulfillmentStore> = Arc::new(storage);

        let engine = Arc::new(Engine::new(store, config.event_channel_capacity).await?);

        tracing::info!("Server state initialized (database: {})", db_path.display());

        Ok(Self {
            config: config.clone(),
            engine,
        })
    }

    /// Working directory as a path
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.config.work_dir)
    }

    /// Fulfillment engine handle
    pub fn engine(&self) -> Arc<Engine> {
        self.engine.clone()
    }
}
