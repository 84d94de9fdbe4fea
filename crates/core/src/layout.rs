use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::reconcile::ReconciledAllocation;

/// Float slack when comparing a share sum against full booking.
pub const SHARE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareBand {
    pub user_id: String,
    pub effective_share: f64,
    pub width_percent: f64,
}

/// Column reserved right of the 100% mark. Every resource gets the same
/// width so resources stay comparable; `filled_percent` is this resource's
/// own excess and is zero for resources that are not overbooked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OverbookingColumn {
    pub width_percent: f64,
    pub filled_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceLayout {
    pub resource_id: i64,
    pub resource_name: String,
    pub total_drives: u32,
    pub entries: Vec<ShareBand>,
    pub share_sum: f64,
    pub booked_percent: f64,
    pub free_capacity: f64,
    pub free_percent: Option<f64>,
    pub is_overbooked: bool,
    pub overbooked_by: f64,
    pub overbooking: OverbookingColumn,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FairShareLayout {
    pub resources: BTreeMap<i64, ResourceLayout>,
    pub max_booking_ratio: f64,
}

impl FairShareLayout {
    pub fn has_overbooking(&self) -> bool {
        self.max_booking_ratio > 0.0
    }
}

struct ResourceGroup<'a> {
    name: &'a str,
    total_drives: u32,
    records: Vec<&'a ReconciledAllocation>,
    share_sum: f64,
}

/// Lays out the share bands of every resource.
///
/// The share sums of all resources are computed first so that the shared
/// overbooking scale is known before any single resource is laid out.
pub fn layout(reconciled: &[ReconciledAllocation]) -> FairShareLayout {
    let mut groups: BTreeMap<i64, ResourceGroup<'_>> = BTreeMap::new();
    for record in reconciled {
        let group = groups
            .entry(record.resource_id)
            .or_insert_with(|| ResourceGroup {
                name: &record.resource_name,
                total_drives: record.total_drives,
                records: Vec::new(),
                share_sum: 0.0,
            });
        if group.name.is_empty() && !record.resource_name.is_empty() {
            group.name = &record.resource_name;
            group.total_drives = record.total_drives;
        }
        group.share_sum += record.effective_share;
        group.records.push(record);
    }

    let max_booking_ratio = groups
        .values()
        .map(|group| overbooked_by(group.share_sum))
        .fold(0.0_f64, f64::max);

    let resources = groups
        .into_iter()
        .map(|(resource_id, group)| {
            (
                resource_id,
                layout_resource(resource_id, group, max_booking_ratio),
            )
        })
        .collect();

    FairShareLayout {
        resources,
        max_booking_ratio,
    }
}

fn layout_resource(
    resource_id: i64,
    group: ResourceGroup<'_>,
    max_booking_ratio: f64,
) -> ResourceLayout {
    let mut entries: Vec<ShareBand> = group
        .records
        .iter()
        .filter(|record| record.effective_share > 0.0)
        .map(|record| ShareBand {
            user_id: record.user_id.clone(),
            effective_share: record.effective_share,
            width_percent: record.effective_share * 100.0,
        })
        .collect();
    entries.sort_by(|a, b| {
        b.effective_share
            .total_cmp(&a.effective_share)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    let share_sum = group.share_sum;
    let free_capacity = 1.0 - share_sum;
    let excess = overbooked_by(share_sum);
    ResourceLayout {
        resource_id,
        resource_name: group.name.to_string(),
        total_drives: group.total_drives,
        entries,
        share_sum,
        booked_percent: share_sum * 100.0,
        free_capacity,
        free_percent: (free_capacity > SHARE_EPSILON).then_some(free_capacity * 100.0),
        is_overbooked: excess > 0.0,
        overbooked_by: excess,
        overbooking: OverbookingColumn {
            width_percent: max_booking_ratio * 100.0,
            filled_percent: excess * 100.0,
        },
    }
}

fn overbooked_by(share_sum: f64) -> f64 {
    if share_sum > 1.0 + SHARE_EPSILON {
        share_sum - 1.0
    } else {
        0.0
    }
}
