//! SQL schema for the Roster SQLite store.
//!
//! Executed on every `initialize`; there is no migration path.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    last_name   TEXT NOT NULL CHECK (last_name  <> ''),
    first_name  TEXT NOT NULL CHECK (first_name <> ''),
    middle_name TEXT,                               -- '' when omitted
    created_at  TIMESTAMP DEFAULT CURRENT_TIMESTAMP -- UTC, 'YYYY-MM-DD HH:MM:SS'
);
";

/// Column list shared by every read query, in [`crate::encode::RawRecord`]
/// field order.
pub const SELECT_RECORD: &str =
  "SELECT id, last_name, first_name, middle_name, created_at FROM users";
