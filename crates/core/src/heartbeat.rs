use serde::{Deserialize, Serialize};

/// Last beat recorded by the scheduler process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatRow {
    pub pid: u32,
    pub start_time: String,
    pub last_beat_age_secs: u64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatStatus {
    pub pid: u32,
    pub start_time: String,
    pub seconds_since_last_beat: u64,
    pub message: String,
    pub is_stale: bool,
}

pub fn evaluate(row: &HeartbeatRow, stale_threshold_secs: u64) -> HeartbeatStatus {
    HeartbeatStatus {
        pid: row.pid,
        start_time: row.start_time.clone(),
        seconds_since_last_beat: row.last_beat_age_secs,
        message: row.message.clone(),
        is_stale: row.last_beat_age_secs > stale_threshold_secs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(age: u64) -> HeartbeatRow {
        HeartbeatRow {
            pid: 4242,
            start_time: "2025-03-01T08:00:00Z".to_string(),
            last_beat_age_secs: age,
            message: "dispatcher running".to_string(),
        }
    }

    #[test]
    fn old_beat_is_stale() {
        let status = evaluate(&row(400), 300);
        assert!(status.is_stale);
        assert_eq!(status.pid, 4242);
        assert_eq!(status.seconds_since_last_beat, 400);
    }

    #[test]
    fn beat_at_threshold_is_fresh() {
        assert!(!evaluate(&row(300), 300).is_stale);
        assert!(!evaluate(&row(0), 300).is_stale);
    }
}
