pub mod app;
pub mod config;
pub mod error;
pub mod services;

pub use app::{AppConfig, AppState};
pub use config::{DEFAULT_STALE_THRESHOLD_SECS, ReportOptions};
pub use error::{ApiError, AppError, Result};
pub use services::{AppServices, DashboardService};
