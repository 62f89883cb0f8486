pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;

use std::sync::Arc;

use config::AppConfig;
use engine::format::EnglishFormatter;
use engine::snapshot::SnapshotProvider;
use engine::state::NotificationStore;
use engine::AlertEngine;
use error::AppError;

pub use engine::feed::{AlertFeed, FeedSummary};
pub use engine::types::{Alert, AlertCategory, Milestone, Severity};

/// Wire an engine from configuration: SQLite-backed notification state in
/// the data directory and the built-in English formatter.
pub fn build_engine(
    config: &AppConfig,
    provider: Arc<dyn SnapshotProvider>,
) -> Result<AlertEngine, AppError> {
    let pool = db::init_db(&config.db_path())?;
    let store = NotificationStore::new(Arc::new(pool));
    let formatter = Arc::new(EnglishFormatter::new(config.currency_symbol.clone()));

    tracing::info!(
        data_dir = %config.data_dir.display(),
        currency = %config.currency_symbol,
        "Alert engine ready"
    );
    Ok(AlertEngine::new(provider, formatter, store))
}
