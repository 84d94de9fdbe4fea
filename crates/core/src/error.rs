use serde::{Deserialize, Serialize};

use crate::status::EntityType;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("data integrity error: {0}")]
    DataIntegrity(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Per-row problem found while computing a report. Anomalies never abort a
/// computation; they are returned next to the result so the renderer can
/// surface them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    UnknownStatusCode {
        entity: EntityType,
        owner: String,
        code: i64,
        count: u64,
    },
    MissingResourceMetadata {
        resource_id: i64,
        user_id: String,
    },
    DuplicateAllocation {
        resource_id: i64,
        user_id: String,
    },
    InvalidShare {
        resource_id: i64,
        user_id: String,
        share: f64,
    },
    UnreadableOverride {
        resource_id: i64,
        user_id: String,
        value: String,
    },
    UnreadableHeartbeat {
        pid: u32,
        last_time: String,
    },
}

impl std::fmt::Display for Anomaly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Anomaly::UnknownStatusCode {
                entity,
                owner,
                code,
                count,
            } => write!(
                f,
                "unknown {:?} status code {} for '{}' ({} rows)",
                entity, code, owner, count
            ),
            Anomaly::MissingResourceMetadata {
                resource_id,
                user_id,
            } => write!(
                f,
                "drive usage by '{}' on unknown resource {}",
                user_id, resource_id
            ),
            Anomaly::DuplicateAllocation {
                resource_id,
                user_id,
            } => write!(
                f,
                "duplicate allocation for '{}' on resource {}",
                user_id, resource_id
            ),
            Anomaly::InvalidShare {
                resource_id,
                user_id,
                share,
            } => write!(
                f,
                "share {} for '{}' on resource {} is outside [0, 1], counted as 0",
                share, user_id, resource_id
            ),
            Anomaly::UnreadableOverride {
                resource_id,
                user_id,
                value,
            } => write!(
                f,
                "override share '{}' for '{}' on resource {} is not a number, declared share used",
                value, user_id, resource_id
            ),
            Anomaly::UnreadableHeartbeat { pid, last_time } => write!(
                f,
                "heartbeat of pid {} has unreadable time '{}'",
                pid, last_time
            ),
        }
    }
}
