use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::Config;

/// Per-process handles shared by every request.
///
/// The connection is a pool; each handler checks out what it needs for the
/// duration of one query or one transaction.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
