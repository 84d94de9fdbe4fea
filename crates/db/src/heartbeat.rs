use chrono::{DateTime, Utc};
use monitor_core::{Anomaly, HeartbeatRow};

use crate::error::Result;
use crate::helpers::parse_timestamp;
use crate::{Db, Fetched};

impl Db {
    /// Most recent beat, with its age measured against `now`. A beat stamped
    /// in the future counts as zero seconds old.
    ///
    /// Beats are compared by parsed instant, so rows written in different
    /// timestamp forms still order correctly. Rows whose time cannot be
    /// parsed are skipped and reported.
    pub fn latest_heartbeat(&self, now: DateTime<Utc>) -> Result<Fetched<Option<HeartbeatRow>>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT pid, start_time, last_time, COALESCE(message, '')
            FROM heart_beat
            "#,
        )?;
        let mut rows = stmt.query([])?;
        let mut fetched = Fetched::default();
        let mut latest: Option<(DateTime<Utc>, HeartbeatRow)> = None;
        while let Some(row) = rows.next()? {
            let pid = row.get::<_, i64>(0)?.clamp(0, i64::from(u32::MAX)) as u32;
            let last_time: String = row.get(2)?;
            let Ok(last_beat) = parse_timestamp(&last_time) else {
                fetched
                    .anomalies
                    .push(Anomaly::UnreadableHeartbeat { pid, last_time });
                continue;
            };
            if latest.as_ref().is_some_and(|(seen, _)| *seen >= last_beat) {
                continue;
            }
            let age = (now - last_beat).num_seconds().max(0) as u64;
            latest = Some((
                last_beat,
                HeartbeatRow {
                    pid,
                    start_time: row.get(1)?,
                    last_beat_age_secs: age,
                    message: row.get(3)?,
                },
            ));
        }
        fetched.rows = latest.map(|(_, row)| row);
        Ok(fetched)
    }
}
