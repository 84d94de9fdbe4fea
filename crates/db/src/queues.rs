use monitor_core::{InfoEntry, QueueDetail, QueueStatus, StatusCode};
use rusqlite::params;

use crate::Db;
use crate::error::Result;
use crate::helpers::non_negative;

impl Db {
    /// Created, activated and suspended queues with their media name.
    pub fn live_queue_details(&self) -> Result<Vec<QueueDetail>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT q.id, q.name, COALESCE(m.name, ''), q.owner, q.status, q.byte_size,
                   q.nb_reqs, q.nb_reqs_done, q.nb_reqs_failed,
                   q.creation_time, q.activation_time, q.suspension_time
            FROM queues q
            LEFT JOIN mediatypes m ON m.id = q.media_id
            WHERE q.status IN (?1, ?2, ?3)
            ORDER BY q.name, q.id
            "#,
        )?;
        let mut rows = stmt.query(params![
            QueueStatus::Created.code(),
            QueueStatus::Activated.code(),
            QueueStatus::Suspended.code(),
        ])?;
        let mut details = Vec::new();
        while let Some(row) = rows.next()? {
            let Some(status) = QueueStatus::from_code(row.get(4)?) else {
                continue;
            };
            details.push(QueueDetail {
                queue_id: row.get(0)?,
                tape: row.get(1)?,
                media: row.get(2)?,
                owner: row.get(3)?,
                status,
                byte_size: non_negative(row.get(5)?),
                requests: non_negative(row.get(6)?),
                requests_done: non_negative(row.get(7)?),
                requests_failed: non_negative(row.get(8)?),
                creation_time: row.get(9)?,
                activation_time: row.get(10)?,
                suspension_time: row.get(11)?,
            });
        }
        Ok(details)
    }

    pub fn information_rows(&self) -> Result<Vec<InfoEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT name, value
            FROM information
            ORDER BY name
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(InfoEntry {
                name: row.get(0)?,
                value: row.get(1)?,
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
