//! Response envelope and positional row encoding.
//!
//! Every body carries `"status": "success" | "error"`. Records travel as
//! `[id, last_name, first_name, middle_name_or_null, created_at]` arrays,
//! which is the shape the page script indexes into.

use roster_core::record::Record;
use serde_json::{Map, Value, json};

/// `created_at` rendering; matches SQLite's `CURRENT_TIMESTAMP` text.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encode one record as its positional array.
pub fn user_row(record: &Record) -> Value {
  json!([
    record.id,
    record.last_name,
    record.first_name,
    record.middle_name,
    record.created_at.format(TIMESTAMP_FORMAT).to_string(),
  ])
}

pub fn user_rows(records: &[Record]) -> Value {
  Value::Array(records.iter().map(user_row).collect())
}

/// `{"status": "success", ...fields}`.
pub fn success(fields: impl IntoIterator<Item = (&'static str, Value)>) -> Value {
  let mut body = Map::new();
  body.insert("status".into(), json!("success"));
  for (key, value) in fields {
    body.insert(key.into(), value);
  }
  Value::Object(body)
}

/// `{"status": "error", "message": ...}`.
pub fn error(message: &str) -> Value {
  json!({ "status": "error", "message": message })
}
