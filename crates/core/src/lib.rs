//! Aggregation and reconciliation engine behind the tape scheduler
//! dashboard. Every function here is pure over a fetched [`Snapshot`].

pub mod aggregate;
pub mod error;
pub mod heartbeat;
pub mod layout;
pub mod reconcile;
pub mod report;
pub mod status;
pub mod tapes;

pub use aggregate::{AggregateRow, StatusAggregation, StatusEvent, aggregate};
pub use error::{Anomaly, EngineError, Result};
pub use heartbeat::{HeartbeatRow, HeartbeatStatus, evaluate};
pub use layout::{FairShareLayout, OverbookingColumn, ResourceLayout, ShareBand, layout};
pub use reconcile::{
    AllocationEntry, ReconciledAllocation, Reconciliation, ResourceInfo, UsageEntry, reconcile,
    reconcile_with_catalog,
};
pub use report::{DashboardReport, InfoEntry, Snapshot, build_report};
pub use status::{EntityType, QueueStatus, RequestStatus, StatusCode};
pub use tapes::{QueueDetail, TapeQueueSummary, TapeQueues, summarize_tape_queues};
