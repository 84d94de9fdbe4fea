use serde::{Deserialize, Serialize};

/// Which scheduler table a status-count row was grouped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Queue,
    Request,
}

/// Closed set of statuses for one entity type, mapped to the numeric codes
/// the scheduler stores.
pub trait StatusCode: Copy + Ord + std::fmt::Debug + Send + Sync + 'static {
    const ENTITY: EntityType;
    const ALL: &'static [Self];

    fn code(self) -> i64;
    fn label(self) -> &'static str;

    fn from_code(code: i64) -> Option<Self> {
        Self::ALL.iter().copied().find(|status| status.code() == code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueStatus {
    Created,
    Activated,
    Suspended,
    Ended,
    Aborted,
}

impl StatusCode for QueueStatus {
    const ENTITY: EntityType = EntityType::Queue;
    const ALL: &'static [Self] = &[
        QueueStatus::Created,
        QueueStatus::Activated,
        QueueStatus::Suspended,
        QueueStatus::Ended,
        QueueStatus::Aborted,
    ];

    fn code(self) -> i64 {
        match self {
            QueueStatus::Created => 200,
            QueueStatus::Activated => 210,
            QueueStatus::Suspended => 220,
            QueueStatus::Ended => 230,
            QueueStatus::Aborted => 240,
        }
    }

    fn label(self) -> &'static str {
        match self {
            QueueStatus::Created => "Created",
            QueueStatus::Activated => "Activated",
            QueueStatus::Suspended => "Temporarily Suspended",
            QueueStatus::Ended => "Ended",
            QueueStatus::Aborted => "Aborted",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Created,
    Submitted,
    Queued,
    Staged,
    OnDisk,
    Failed,
}

impl StatusCode for RequestStatus {
    const ENTITY: EntityType = EntityType::Request;
    const ALL: &'static [Self] = &[
        RequestStatus::Created,
        RequestStatus::Submitted,
        RequestStatus::Queued,
        RequestStatus::Staged,
        RequestStatus::OnDisk,
        RequestStatus::Failed,
    ];

    fn code(self) -> i64 {
        match self {
            RequestStatus::Created => 100,
            RequestStatus::Submitted => 110,
            RequestStatus::Queued => 120,
            RequestStatus::Staged => 140,
            RequestStatus::OnDisk => 150,
            RequestStatus::Failed => 160,
        }
    }

    fn label(self) -> &'static str {
        match self {
            RequestStatus::Created => "Created",
            RequestStatus::Submitted => "Submitted",
            RequestStatus::Queued => "Queued",
            RequestStatus::Staged => "Staged",
            RequestStatus::OnDisk => "On disk",
            RequestStatus::Failed => "Failed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_code() {
        for status in QueueStatus::ALL {
            assert_eq!(QueueStatus::from_code(status.code()), Some(*status));
        }
        for status in RequestStatus::ALL {
            assert_eq!(RequestStatus::from_code(status.code()), Some(*status));
        }
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert_eq!(QueueStatus::from_code(250), None);
        assert_eq!(RequestStatus::from_code(130), None);
        assert_eq!(RequestStatus::from_code(200), None);
    }
}
