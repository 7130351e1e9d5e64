//! Record types — the single entity held by the Roster store.
//!
//! A record is a person's name with a store-assigned id and creation time.
//! Only the three name fields ever change after the record is written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

// ─── Record ──────────────────────────────────────────────────────────────────

/// A persisted name record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
  /// Store-assigned; never reused, even after deletion.
  pub id:          i64,
  pub last_name:   String,
  pub first_name:  String,
  /// `None` when the stored value is `NULL` or the empty string.
  pub middle_name: Option<String>,
  /// Server-assigned timestamp; never changes after creation.
  pub created_at:  DateTime<Utc>,
}

impl Record {
  /// `"Last First Middle"`, skipping an absent middle name.
  pub fn full_name(&self) -> String {
    match &self.middle_name {
      Some(middle) => format!("{} {} {middle}", self.last_name, self.first_name),
      None => format!("{} {}", self.last_name, self.first_name),
    }
  }
}

// ─── RecordNames ─────────────────────────────────────────────────────────────

/// The mutable part of a record: input to
/// [`crate::store::RecordStore::add`] and
/// [`crate::store::RecordStore::update`].
///
/// `id` and `created_at` are always set by the store; they are not accepted
/// from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordNames {
  pub last_name:   String,
  pub first_name:  String,
  /// Persisted as the empty string when `None`.
  pub middle_name: Option<String>,
}

impl RecordNames {
  pub fn new(
    last_name: impl Into<String>,
    first_name: impl Into<String>,
    middle_name: Option<String>,
  ) -> Self {
    Self {
      last_name: last_name.into(),
      first_name: first_name.into(),
      middle_name,
    }
  }

  /// Reject names that would violate the non-empty invariant.
  pub fn validate(&self) -> Result<()> {
    if self.last_name.is_empty() {
      return Err(Error::ConstraintViolation { field: "last_name" });
    }
    if self.first_name.is_empty() {
      return Err(Error::ConstraintViolation { field: "first_name" });
    }
    Ok(())
  }

  /// The value written to the `middle_name` column.
  pub fn middle_name_or_empty(&self) -> &str {
    self.middle_name.as_deref().unwrap_or_default()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn validate_accepts_missing_middle_name() {
    let names = RecordNames::new("Ivanov", "Ivan", None);
    assert!(names.validate().is_ok());
    assert_eq!(names.middle_name_or_empty(), "");
  }

  #[test]
  fn validate_rejects_empty_last_name() {
    let err = RecordNames::new("", "Ivan", None).validate().unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation { field: "last_name" }));
  }

  #[test]
  fn validate_rejects_empty_first_name() {
    let err = RecordNames::new("Ivanov", "", Some("Ivanovich".into()))
      .validate()
      .unwrap_err();
    assert!(matches!(err, Error::ConstraintViolation { field: "first_name" }));
  }

  #[test]
  fn full_name_skips_absent_middle_name() {
    let record = Record {
      id:          1,
      last_name:   "Petrov".into(),
      first_name:  "Petr".into(),
      middle_name: None,
      created_at:  Utc::now(),
    };
    assert_eq!(record.full_name(), "Petrov Petr");

    let record = Record { middle_name: Some("Petrovich".into()), ..record };
    assert_eq!(record.full_name(), "Petrov Petr Petrovich");
  }
}
