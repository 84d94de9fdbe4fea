use monitor_core::{EntityType, StatusEvent};

use crate::Db;
use crate::error::Result;
use crate::helpers::non_negative;

impl Db {
    pub fn queue_status_rows(&self) -> Result<Vec<StatusEvent>> {
        self.status_rows(
            EntityType::Queue,
            r#"
            SELECT owner, status, COUNT(*)
            FROM queues
            GROUP BY owner, status
            ORDER BY owner, status
            "#,
        )
    }

    pub fn request_status_rows(&self) -> Result<Vec<StatusEvent>> {
        self.status_rows(
            EntityType::Request,
            r#"
            SELECT user, status, COUNT(*)
            FROM requests
            GROUP BY user, status
            ORDER BY user, status
            "#,
        )
    }

    fn status_rows(&self, entity: EntityType, sql: &str) -> Result<Vec<StatusEvent>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map([], |row| {
            Ok(StatusEvent {
                entity,
                owner: row.get(0)?,
                status_code: row.get(1)?,
                count: non_negative(row.get(2)?),
            })
        })?;
        Ok(rows.collect::<std::result::Result<Vec<_>, _>>()?)
    }
}
