use std::sync::Arc;
use smartfaq_ai::AiService;
use smartfaq_persist::ChatStore;
use crate::config::Config;

/// Shared application state passed to all handlers
///
/// The chat store is picked once at startup (MongoDB or the in-memory
/// fallback) and never swapped afterwards.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn ChatStore>,
    pub ai: Arc<dyn AiService>,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn ChatStore>,
        ai: Arc<dyn AiService>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            ai,
        }
    }
}
