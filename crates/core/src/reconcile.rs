use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{Anomaly, Result};
use crate::layout::SHARE_EPSILON;

/// Declared drive share of one user on one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub resource_id: i64,
    pub resource_name: String,
    pub total_drives: u32,
    pub user_id: String,
    pub declared_share: f64,
    pub override_share: Option<f64>,
}

impl AllocationEntry {
    pub fn effective_share(&self) -> f64 {
        self.override_share.unwrap_or(self.declared_share)
    }
}

/// One currently mounted drive, attributed to a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageEntry {
    pub resource_id: i64,
    pub user_id: String,
}

/// Catalog entry for a resource (media type) and its drive count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceInfo {
    pub resource_id: i64,
    pub name: String,
    pub total_drives: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledAllocation {
    pub resource_id: i64,
    pub resource_name: String,
    pub total_drives: u32,
    pub user_id: String,
    pub effective_share: f64,
    pub allocated_drives: u32,
    pub used_drives: u32,
    pub is_orphan: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub allocations: Vec<ReconciledAllocation>,
    pub anomalies: Vec<Anomaly>,
}

type AllocationKey = (i64, String);

/// Merges declared shares with live drive usage, resolving orphan usage
/// against the resources named by the allocations themselves.
pub fn reconcile(allocations: &[AllocationEntry], usage: &[UsageEntry]) -> Result<Reconciliation> {
    reconcile_with_catalog(allocations, usage, &[])
}

/// Same as [`reconcile`], with an explicit resource catalog used to name
/// resources that only appear in the usage rows.
pub fn reconcile_with_catalog(
    allocations: &[AllocationEntry],
    usage: &[UsageEntry],
    catalog: &[ResourceInfo],
) -> Result<Reconciliation> {
    let mut anomalies = Vec::new();

    let mut resources: HashMap<i64, (&str, u32)> = catalog
        .iter()
        .map(|info| (info.resource_id, (info.name.as_str(), info.total_drives)))
        .collect();
    for entry in allocations {
        resources
            .entry(entry.resource_id)
            .or_insert((entry.resource_name.as_str(), entry.total_drives));
    }

    let mut used: BTreeMap<AllocationKey, u32> = BTreeMap::new();
    for row in usage {
        *used
            .entry((row.resource_id, row.user_id.clone()))
            .or_insert(0) += 1;
    }

    // Slot per key in first-seen order; a repeated key overwrites its slot.
    let mut slots: HashMap<AllocationKey, usize> = HashMap::new();
    let mut records: Vec<ReconciledAllocation> = Vec::with_capacity(allocations.len());
    for entry in allocations {
        let share = match checked_share(entry) {
            Some(share) => share,
            None => {
                anomalies.push(Anomaly::InvalidShare {
                    resource_id: entry.resource_id,
                    user_id: entry.user_id.clone(),
                    share: entry.effective_share(),
                });
                0.0
            }
        };
        let key = (entry.resource_id, entry.user_id.clone());
        let record = ReconciledAllocation {
            resource_id: entry.resource_id,
            resource_name: entry.resource_name.clone(),
            total_drives: entry.total_drives,
            user_id: entry.user_id.clone(),
            effective_share: share,
            allocated_drives: allocated_drives(share, entry.total_drives),
            used_drives: 0,
            is_orphan: false,
        };
        match slots.get(&key) {
            Some(&index) => {
                anomalies.push(Anomaly::DuplicateAllocation {
                    resource_id: entry.resource_id,
                    user_id: entry.user_id.clone(),
                });
                records[index] = record;
            }
            None => {
                slots.insert(key, records.len());
                records.push(record);
            }
        }
    }

    for ((resource_id, user_id), count) in used {
        if let Some(&index) = slots.get(&(resource_id, user_id.clone())) {
            records[index].used_drives = count;
            continue;
        }
        let (resource_name, total_drives) = match resources.get(&resource_id) {
            Some(&(name, drives)) => (name.to_string(), drives),
            None => {
                anomalies.push(Anomaly::MissingResourceMetadata {
                    resource_id,
                    user_id: user_id.clone(),
                });
                (String::new(), 0)
            }
        };
        records.push(ReconciledAllocation {
            resource_id,
            resource_name,
            total_drives,
            user_id,
            effective_share: 0.0,
            allocated_drives: 0,
            used_drives: count,
            is_orphan: true,
        });
    }

    Ok(Reconciliation {
        allocations: records,
        anomalies,
    })
}

fn checked_share(entry: &AllocationEntry) -> Option<f64> {
    let share = entry.effective_share();
    (share.is_finite() && (0.0..=1.0).contains(&share)).then_some(share)
}

// 0.57 * 100.0 is 56.99999999999999; the slack keeps it at 57 drives.
fn allocated_drives(share: f64, total_drives: u32) -> u32 {
    (share * f64::from(total_drives) + SHARE_EPSILON).floor() as u32
}
