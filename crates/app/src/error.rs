use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("engine error: {0}")]
    Engine(#[from] monitor_core::EngineError),
    #[error("db error: {0}")]
    Db(#[from] monitor_db::DbError),
    #[error("{0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        let (status, code) = match err {
            AppError::NotFound(_) => (404, Some("not_found".to_string())),
            AppError::Engine(_) => (422, Some("data_integrity".to_string())),
            AppError::Db(_) => (500, None),
        };
        Self {
            status,
            message: err.to_string(),
            code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use monitor_core::EngineError;

    #[test]
    fn data_integrity_maps_to_unprocessable() {
        let api: ApiError = AppError::from(EngineError::DataIntegrity("bad share".to_string())).into();
        assert_eq!(api.status, 422);
        assert_eq!(api.code.as_deref(), Some("data_integrity"));
        assert!(api.message.contains("bad share"));
    }

    #[test]
    fn missing_database_maps_to_not_found() {
        let api: ApiError = AppError::NotFound("database not found".to_string()).into();
        assert_eq!(api.status, 404);
    }

    #[test]
    fn database_failures_map_to_internal_error() {
        let err = rusqlite::Connection::open_in_memory()
            .and_then(|conn| conn.execute("SELECT * FROM missing_table", []))
            .expect_err("query on missing table");
        let api: ApiError = AppError::from(monitor_db::DbError::from(err)).into();
        assert_eq!(api.status, 500);
        assert_eq!(api.code, None);
        assert!(api.message.starts_with("db error"));
    }
}
