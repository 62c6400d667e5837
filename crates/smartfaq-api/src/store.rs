use std::sync::Arc;
use std::time::Duration;

use smartfaq_persist::{ChatStore, InMemoryChatStore, MongoChatStore};
use crate::config::MongoDbConfig;

/// Connect to MongoDB, or fall back to the bounded in-memory store
///
/// Runs once at startup. A failed connection is not retried; the process
/// keeps using the fallback until it restarts.
pub async fn select_store(config: &MongoDbConfig) -> Arc<dyn ChatStore> {
    tracing::info!("Connecting to MongoDB");

    match MongoChatStore::connect(
        &config.uri,
        &config.database,
        &config.collection,
        Duration::from_millis(config.timeout_ms),
    )
    .await
    {
        Ok(store) => {
            tracing::info!(database = %config.database, "MongoDB connected");
            Arc::new(store)
        }
        Err(e) => {
            tracing::error!("MongoDB connection failed: {}", e);
            tracing::warn!("Using in-memory fallback storage");
            Arc::new(InMemoryChatStore::new())
        }
    }
}
