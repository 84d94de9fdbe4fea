use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::Row;
use rusqlite::types::ValueRef;

use crate::error::Result;

/// Raw content of a nullable override column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum OverrideShare {
    Absent,
    Share(f64),
    Unreadable(String),
}

/// NULL and blank text both mean "no override". Text that is not a number
/// and blobs come back as [`OverrideShare::Unreadable`] so the caller can
/// skip the value without failing the read.
pub(crate) fn override_share(row: &Row<'_>, idx: usize) -> Result<OverrideShare> {
    Ok(match row.get_ref(idx)? {
        ValueRef::Null => OverrideShare::Absent,
        ValueRef::Integer(value) => OverrideShare::Share(value as f64),
        ValueRef::Real(value) => OverrideShare::Share(value),
        ValueRef::Text(bytes) => {
            let text = String::from_utf8_lossy(bytes);
            let trimmed = text.trim();
            if trimmed.is_empty() {
                OverrideShare::Absent
            } else {
                match trimmed.parse::<f64>() {
                    Ok(value) => OverrideShare::Share(value),
                    Err(_) => OverrideShare::Unreadable(trimmed.to_string()),
                }
            }
        }
        ValueRef::Blob(_) => OverrideShare::Unreadable("<blob>".to_string()),
    })
}

pub(crate) fn non_negative(value: i64) -> u64 {
    value.max(0) as u64
}

/// Accepts RFC 3339 as well as the `YYYY-MM-DD HH:MM:SS` form the
/// scheduler writes, which is taken as UTC.
pub(crate) fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")?;
    Ok(naive.and_utc())
}
