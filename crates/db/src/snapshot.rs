use chrono::{DateTime, Utc};
use monitor_core::Snapshot;

use crate::Db;
use crate::error::Result;

impl Db {
    /// Fetches every row set of one reporting cycle inside a single read
    /// transaction so the counts and the drive usage agree with each other.
    /// The transaction rolls back on drop if any read fails.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Result<Snapshot> {
        let tx = self.conn.unchecked_transaction()?;
        let snapshot = self.read_snapshot(now)?;
        tx.commit()?;
        Ok(snapshot)
    }

    fn read_snapshot(&self, now: DateTime<Utc>) -> Result<Snapshot> {
        let allocations = self.allocation_rows()?;
        let heartbeat = self.latest_heartbeat(now)?;
        let mut anomalies = allocations.anomalies;
        anomalies.extend(heartbeat.anomalies);
        Ok(Snapshot {
            queue_status: self.queue_status_rows()?,
            request_status: self.request_status_rows()?,
            allocations: allocations.rows,
            usage: self.drive_usage_rows()?,
            resources: self.resource_catalog()?,
            heartbeat: heartbeat.rows,
            information: self.information_rows()?,
            tape_queues: self.live_queue_details()?,
            anomalies,
        })
    }
}
