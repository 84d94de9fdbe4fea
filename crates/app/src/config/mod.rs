use serde::{Deserialize, Serialize};

pub const DEFAULT_STALE_THRESHOLD_SECS: u64 = 300;

/// Per-call overrides for a report build.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ReportOptions {
    pub stale_threshold_secs: Option<u64>,
}
