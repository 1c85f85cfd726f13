use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::SqliteClassStore;
use crate::schedule::ConflictChecker;

/// State shared by every request handler.
pub struct AppState {
    pub config: AppConfig,
    /// Class store used for writes and direct reads
    pub store: Arc<SqliteClassStore>,
    /// Conflict checker reading from the same store
    pub checker: ConflictChecker,
}

impl AppState {
    pub fn new(config: AppConfig, store: SqliteClassStore) -> Self {
        let store = Arc::new(store);
        let checker = ConflictChecker::with_config(store.clone(), config.checker.clone());
        Self {
            config,
            store,
            checker,
        }
    }
}
