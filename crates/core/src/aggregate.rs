use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Anomaly, EngineError, Result};
use crate::status::{EntityType, StatusCode};

/// Raw grouped row: how many queues or requests of one owner are in one
/// status code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub entity: EntityType,
    pub owner: String,
    pub status_code: i64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateRow<S: Ord> {
    pub counts: BTreeMap<S, u64>,
    pub unknown: u64,
    pub total: u64,
}

impl<S: Ord> Default for AggregateRow<S> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            unknown: 0,
            total: 0,
        }
    }
}

impl<S: StatusCode> AggregateRow<S> {
    pub fn count(&self, status: S) -> u64 {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    fn add(&mut self, status: Option<S>, count: u64) -> Result<()> {
        let total = checked_sum(self.total, count)?;
        match status {
            Some(status) => {
                let slot = self.counts.entry(status).or_insert(0);
                *slot = checked_sum(*slot, count)?;
            }
            None => self.unknown = checked_sum(self.unknown, count)?,
        }
        self.total = total;
        Ok(())
    }
}

fn checked_sum(current: u64, count: u64) -> Result<u64> {
    current.checked_add(count).ok_or_else(|| {
        EngineError::DataIntegrity(format!("status count overflow adding {} to {}", count, current))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusAggregation<S: Ord> {
    pub by_owner: BTreeMap<String, AggregateRow<S>>,
    pub global: AggregateRow<S>,
    pub anomalies: Vec<Anomaly>,
}

/// Folds status-count rows into per-owner and global counters.
///
/// Codes outside the closed set of `S` land in the `unknown` bucket and are
/// reported as anomalies. A row for another entity type means the caller
/// handed over the wrong row set, which is the only failure.
pub fn aggregate<S: StatusCode>(rows: &[StatusEvent]) -> Result<StatusAggregation<S>> {
    let mut by_owner: BTreeMap<String, AggregateRow<S>> = BTreeMap::new();
    let mut global = AggregateRow::default();
    let mut anomalies = Vec::new();
    for row in rows {
        if row.entity != S::ENTITY {
            return Err(EngineError::DataIntegrity(format!(
                "{:?} status row for '{}' in a {:?} row set",
                row.entity,
                row.owner,
                S::ENTITY
            )));
        }
        let status = S::from_code(row.status_code);
        if status.is_none() {
            anomalies.push(Anomaly::UnknownStatusCode {
                entity: row.entity,
                owner: row.owner.clone(),
                code: row.status_code,
                count: row.count,
            });
        }
        by_owner
            .entry(row.owner.clone())
            .or_default()
            .add(status, row.count)?;
        global.add(status, row.count)?;
    }
    Ok(StatusAggregation {
        by_owner,
        global,
        anomalies,
    })
}
