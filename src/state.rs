//! Application context shared by every controller. Built once at startup.

use crate::config::ServerConfig;
use crate::store::{ExampleStore, MemoryExampleStore};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppContext {
    pub store: Arc<dyn ExampleStore>,
    pub config: Arc<ServerConfig>,
}

impl AppContext {
    pub fn new(store: Arc<dyn ExampleStore>, config: ServerConfig) -> Self {
        AppContext {
            store,
            config: Arc::new(config),
        }
    }

    /// Default config over an empty in-process store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryExampleStore::new()), ServerConfig::default())
    }
}
