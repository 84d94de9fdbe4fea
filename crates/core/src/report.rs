use serde::{Deserialize, Serialize};

use crate::aggregate::{StatusAggregation, StatusEvent, aggregate};
use crate::error::{Anomaly, Result};
use crate::heartbeat::{HeartbeatRow, HeartbeatStatus, evaluate};
use crate::layout::{FairShareLayout, layout};
use crate::reconcile::{
    AllocationEntry, ReconciledAllocation, ResourceInfo, UsageEntry, reconcile_with_catalog,
};
use crate::status::{QueueStatus, RequestStatus};
use crate::tapes::{QueueDetail, TapeQueueSummary, summarize_tape_queues};

/// Component name/value pair from the scheduler's information table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfoEntry {
    pub name: String,
    pub value: String,
}

/// Every row set fetched for one reporting cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub queue_status: Vec<StatusEvent>,
    pub request_status: Vec<StatusEvent>,
    pub allocations: Vec<AllocationEntry>,
    pub usage: Vec<UsageEntry>,
    pub resources: Vec<ResourceInfo>,
    pub heartbeat: Option<HeartbeatRow>,
    pub information: Vec<InfoEntry>,
    pub tape_queues: Vec<QueueDetail>,
    /// Rows the reader skipped or repaired while fetching.
    pub anomalies: Vec<Anomaly>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub information: Vec<InfoEntry>,
    pub heartbeat: Option<HeartbeatStatus>,
    pub queues: StatusAggregation<QueueStatus>,
    pub requests: StatusAggregation<RequestStatus>,
    pub allocations: Vec<ReconciledAllocation>,
    pub fair_share: FairShareLayout,
    pub tape_queues: TapeQueueSummary,
    pub anomalies: Vec<Anomaly>,
}

pub fn build_report(snapshot: &Snapshot, stale_threshold_secs: u64) -> Result<DashboardReport> {
    let queues = aggregate::<QueueStatus>(&snapshot.queue_status)?;
    let requests = aggregate::<RequestStatus>(&snapshot.request_status)?;
    let reconciliation =
        reconcile_with_catalog(&snapshot.allocations, &snapshot.usage, &snapshot.resources)?;
    let fair_share = layout(&reconciliation.allocations);

    let mut anomalies = snapshot.anomalies.clone();
    anomalies.extend(queues.anomalies.iter().cloned());
    anomalies.extend(requests.anomalies.iter().cloned());
    anomalies.extend(reconciliation.anomalies);

    Ok(DashboardReport {
        information: snapshot.information.clone(),
        heartbeat: snapshot
            .heartbeat
            .as_ref()
            .map(|row| evaluate(row, stale_threshold_secs)),
        queues,
        requests,
        allocations: reconciliation.allocations,
        fair_share,
        tape_queues: summarize_tape_queues(&snapshot.tape_queues),
        anomalies,
    })
}
