use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::catalog::CatalogProvider;

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub catalog: Box<dyn CatalogProvider>,
    /// Optional narrative layer; without it replies fall back to a plain
    /// deterministic summary.
    pub llm: Option<Box<dyn LlmProvider>>,
}
