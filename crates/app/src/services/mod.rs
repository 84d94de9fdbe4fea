mod dashboard;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::{AppError, Result};
use monitor_db::Db;

pub use dashboard::DashboardService;

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub dashboard: DashboardService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            dashboard: DashboardService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    if !config.db_path.exists() {
        return Err(missing_db(config));
    }
    Ok(Db::open(&config.db_path)?)
}

fn missing_db(config: &SharedConfig) -> AppError {
    AppError::NotFound(format!(
        "scheduler database not found at {}",
        config.db_path.display()
    ))
}
