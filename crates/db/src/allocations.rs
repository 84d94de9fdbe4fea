use monitor_core::{
    AllocationEntry, Anomaly, QueueStatus, ResourceInfo, StatusCode, UsageEntry,
};
use rusqlite::params;

use crate::{Db, Fetched};
use crate::error::Result;
use crate::helpers::{OverrideShare, override_share};

impl Db {
    /// Declared shares joined with their media type. Allocations pointing at
    /// a media type that no longer exists come back with an empty name and
    /// no drives. An override that is not a number is dropped in favour of
    /// the declared share and reported as an anomaly.
    pub fn allocation_rows(&self) -> Result<Fetched<Vec<AllocationEntry>>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT a.media_id, COALESCE(m.name, ''), COALESCE(m.drives, 0),
                   a.user, a.share, a.override_share
            FROM allocations a
            LEFT JOIN mediatypes m ON m.id = a.media_id
            ORDER BY a.media_id, a.user
            "#,
        )?;
        let mut rows = stmt.query([])?;
        let mut fetched: Fetched<Vec<AllocationEntry>> = Fetched::default();
        while let Some(row) = rows.next()? {
            let resource_id: i64 = row.get(0)?;
            let user_id: String = row.get(3)?;
            let override_share = match override_share(row, 5)? {
                OverrideShare::Absent => None,
                OverrideShare::Share(value) => Some(value),
                OverrideShare::Unreadable(value) => {
                    fetched.anomalies.push(Anomaly::UnreadableOverride {
                        resource_id,
                        user_id: user_id.clone(),
                        value,
                    });
                    None
                }
            };
            fetched.rows.push(AllocationEntry {
                resource_id,
                resource_name: row.get(1)?,
                total_drives: row.get::<_, i64>(2)?.clamp(0, i64::from(u32::MAX)) as u32,
                user_id,
                declared_share: row.get(4)?,
                override_share,
            });
        }
        Ok(fetched)
    }

    /// One row per mounted drive: every activated queue holds a drive of
    /// its media type.
    pub fn drive_usage_rows(&self) -> Result<Vec<UsageEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT media_id, owner
            FROM queues
            WHERE status = ?1
            ORDER BY media_id, owner
            "#,
        )?;
        let rows = stmt.query_map(params![QueueStatus::Activated.code()], |row| {
            Ok(UsageEntry {
                resource_id: row.get(0)?,
                user_id: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }

    pub fn resource_catalog(&self) -> Result<Vec<ResourceInfo>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, drives
            FROM mediatypes
            ORDER BY id
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(ResourceInfo {
                resource_id: row.get(0)?,
                name: row.get(1)?,
                total_drives: row.get::<_, i64>(2)?.clamp(0, i64::from(u32::MAX)) as u32,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
