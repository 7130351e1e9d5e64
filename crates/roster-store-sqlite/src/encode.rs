//! Decoding helpers between SQLite rows and Rust domain types.
//!
//! `created_at` is written by SQLite's `CURRENT_TIMESTAMP`, i.e. a UTC
//! `YYYY-MM-DD HH:MM:SS` string. RFC 3339 values are accepted as well so
//! rows written by other tools still decode.

use chrono::{DateTime, NaiveDateTime, Utc};
use roster_core::record::Record;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

const SQLITE_TIMESTAMP: &str = "%Y-%m-%d %H:%M:%S%.f";

pub fn decode_timestamp(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(naive) = NaiveDateTime::parse_from_str(s, SQLITE_TIMESTAMP) {
    return Ok(naive.and_utc());
  }
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Timestamp(format!("{s:?}: {e}")))
}

// ─── Raw row ─────────────────────────────────────────────────────────────────

/// A `users` row exactly as SQLite returns it.
pub struct RawRecord {
  pub id:          i64,
  pub last_name:   String,
  pub first_name:  String,
  pub middle_name: Option<String>,
  pub created_at:  Option<String>,
}

impl RawRecord {
  /// Read a row selected with [`crate::schema::SELECT_RECORD`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      last_name:   row.get(1)?,
      first_name:  row.get(2)?,
      middle_name: row.get(3)?,
      created_at:  row.get(4)?,
    })
  }

  pub fn into_record(self) -> Result<Record> {
    let created_at = self
      .created_at
      .as_deref()
      .ok_or_else(|| Error::Timestamp(format!("record {} has no created_at", self.id)))
      .and_then(decode_timestamp)?;

    Ok(Record {
      id: self.id,
      last_name: self.last_name,
      first_name: self.first_name,
      middle_name: self.middle_name.filter(|m| !m.is_empty()),
      created_at,
    })
  }
}
