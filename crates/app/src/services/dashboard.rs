use chrono::Utc;
use monitor_core::{DashboardReport, HeartbeatStatus, Snapshot, build_report, evaluate};

use crate::config::ReportOptions;
use crate::error::Result;
use crate::services::{SharedConfig, open_db};

#[derive(Clone)]
pub struct DashboardService {
    config: SharedConfig,
}

impl DashboardService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self { config }
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        let db = open_db(&self.config)?;
        Ok(db.snapshot(Utc::now())?)
    }

    pub fn report(&self, options: &ReportOptions) -> Result<DashboardReport> {
        let snapshot = self.snapshot()?;
        self.report_from(&snapshot, options)
    }

    /// Builds a report from rows that were already fetched.
    pub fn report_from(
        &self,
        snapshot: &Snapshot,
        options: &ReportOptions,
    ) -> Result<DashboardReport> {
        let threshold = self.stale_threshold(options);
        let report = build_report(snapshot, threshold)?;
        tracing::debug!(
            owners = report.queues.by_owner.len(),
            users = report.requests.by_owner.len(),
            allocations = report.allocations.len(),
            resources = report.fair_share.resources.len(),
            "built dashboard report"
        );
        for anomaly in &report.anomalies {
            tracing::warn!(%anomaly, "report anomaly");
        }
        if let Some(heartbeat) = report.heartbeat.as_ref() {
            log_heartbeat(heartbeat, threshold);
        }
        Ok(report)
    }

    pub fn heartbeat(&self, options: &ReportOptions) -> Result<Option<HeartbeatStatus>> {
        let db = open_db(&self.config)?;
        let threshold = self.stale_threshold(options);
        let fetched = db.latest_heartbeat(Utc::now())?;
        for anomaly in &fetched.anomalies {
            tracing::warn!(%anomaly, "heartbeat anomaly");
        }
        let status = fetched.rows.map(|row| evaluate(&row, threshold));
        if let Some(heartbeat) = status.as_ref() {
            log_heartbeat(heartbeat, threshold);
        }
        Ok(status)
    }

    fn stale_threshold(&self, options: &ReportOptions) -> u64 {
        options
            .stale_threshold_secs
            .unwrap_or(self.config.stale_threshold_secs)
    }
}

fn log_heartbeat(heartbeat: &HeartbeatStatus, threshold: u64) {
    if heartbeat.is_stale {
        tracing::warn!(
            pid = heartbeat.pid,
            age_secs = heartbeat.seconds_since_last_beat,
            threshold_secs = threshold,
            "scheduler heartbeat is stale"
        );
    }
}
