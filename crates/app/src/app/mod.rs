use std::path::PathBuf;

use crate::config::DEFAULT_STALE_THRESHOLD_SECS;
use crate::error::Result;
use crate::services::AppServices;
use monitor_db::Db;

/// Where the scheduler database lives and how old a heartbeat may get.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub stale_threshold_secs: u64,
}

impl AppConfig {
    pub fn new(db_path: PathBuf) -> Self {
        Self {
            db_path,
            stale_threshold_secs: DEFAULT_STALE_THRESHOLD_SECS,
        }
    }
}

/// Application state shared by frontends.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }

    pub fn setup_db(&self) -> Result<()> {
        let mut db = self.open_db()?;
        db.migrate()?;
        Ok(())
    }
}
