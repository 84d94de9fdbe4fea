use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::status::QueueStatus;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One queue row as listed on the per-tape page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueDetail {
    pub queue_id: i64,
    pub tape: String,
    pub media: String,
    pub owner: String,
    pub status: QueueStatus,
    pub byte_size: u64,
    pub requests: u64,
    pub requests_done: u64,
    pub requests_failed: u64,
    pub creation_time: Option<String>,
    pub activation_time: Option<String>,
    pub suspension_time: Option<String>,
}

impl QueueDetail {
    pub fn size_mb(&self) -> u64 {
        (self.byte_size as f64 / BYTES_PER_MB).round() as u64
    }

    pub fn remaining(&self) -> u64 {
        self.requests
            .saturating_sub(self.requests_done.saturating_add(self.requests_failed))
    }
}

/// Live queues of one tape, one slot per waiting/working state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeQueues {
    pub created: Option<QueueDetail>,
    pub activated: Option<QueueDetail>,
    pub suspended: Option<QueueDetail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TapeQueueSummary {
    pub tapes: BTreeMap<String, TapeQueues>,
    pub created: u64,
    pub activated: u64,
    pub suspended: u64,
}

/// Groups live queues by tape. Ended and aborted queues are not listed;
/// when a tape has several queues in one state the most recent id wins.
pub fn summarize_tape_queues(queues: &[QueueDetail]) -> TapeQueueSummary {
    let mut summary = TapeQueueSummary::default();
    for queue in queues {
        let tape = summary.tapes.entry(queue.tape.clone()).or_default();
        let slot = match queue.status {
            QueueStatus::Created => &mut tape.created,
            QueueStatus::Activated => &mut tape.activated,
            QueueStatus::Suspended => &mut tape.suspended,
            QueueStatus::Ended | QueueStatus::Aborted => continue,
        };
        if slot
            .as_ref()
            .is_none_or(|current| current.queue_id < queue.queue_id)
        {
            *slot = Some(queue.clone());
        }
    }
    summary.tapes.retain(|_, tape| {
        tape.created.is_some() || tape.activated.is_some() || tape.suspended.is_some()
    });
    for tape in summary.tapes.values() {
        summary.created += u64::from(tape.created.is_some());
        summary.activated += u64::from(tape.activated.is_some());
        summary.suspended += u64::from(tape.suspended.is_some());
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;

    fn queue(queue_id: i64, tape: &str, status: QueueStatus) -> QueueDetail {
        QueueDetail {
            queue_id,
            tape: tape.to_string(),
            media: "T10K-B".to_string(),
            owner: "alice".to_string(),
            status,
            byte_size: 3 * 1024 * 1024 + 600 * 1024,
            requests: 10,
            requests_done: 4,
            requests_failed: 1,
            creation_time: Some("2025-03-01T08:00:00Z".to_string()),
            activation_time: None,
            suspension_time: None,
        }
    }

    #[test]
    fn groups_live_queues_by_tape() {
        let summary = summarize_tape_queues(&[
            queue(1, "IT0001", QueueStatus::Activated),
            queue(2, "IT0001", QueueStatus::Created),
            queue(3, "IT0002", QueueStatus::Suspended),
            queue(4, "IT0003", QueueStatus::Ended),
        ]);

        assert_eq!(summary.tapes.len(), 2);
        let first = &summary.tapes["IT0001"];
        assert_eq!(first.activated.as_ref().map(|q| q.queue_id), Some(1));
        assert_eq!(first.created.as_ref().map(|q| q.queue_id), Some(2));
        assert!(first.suspended.is_none());
        assert_eq!(summary.created, 1);
        assert_eq!(summary.activated, 1);
        assert_eq!(summary.suspended, 1);
    }

    #[test]
    fn keeps_latest_queue_per_state() {
        let summary = summarize_tape_queues(&[
            queue(7, "IT0001", QueueStatus::Created),
            queue(5, "IT0001", QueueStatus::Created),
        ]);
        assert_eq!(
            summary.tapes["IT0001"].created.as_ref().map(|q| q.queue_id),
            Some(7)
        );
    }

    #[test]
    fn remaining_and_size_are_derived() {
        let detail = queue(1, "IT0001", QueueStatus::Activated);
        assert_eq!(detail.remaining(), 5);
        assert_eq!(detail.size_mb(), 4);
    }
}
