//! The `RecordStore` trait and the failure taxonomy shared by its backends.
//!
//! The trait is implemented by storage backends (e.g. `roster-store-sqlite`).
//! The HTTP layer (`roster-api`) depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use crate::record::{Record, RecordNames};

// ─── Failure taxonomy ────────────────────────────────────────────────────────

/// Coarse category of a failed store operation, used by callers to pick a
/// user-facing message without knowing the backend's error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
  /// The backing store could not be opened or has gone away.
  ConnectionFailure,
  /// A write would persist an empty required name field.
  ConstraintViolation,
  /// The targeted id does not exist.
  NotFound,
  /// The inbound request could not be parsed at all.
  MalformedRequest,
  /// Any other backend fault.
  Backend,
}

/// Implemented by store error types so callers can classify failures.
pub trait Classify {
  fn kind(&self) -> FailureKind;
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Roster record store backend.
///
/// Every operation reports failure through its `Result`; implementations
/// must never panic on a backend fault.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait RecordStore: Send + Sync {
  type Error: std::error::Error + Classify + Send + Sync + 'static;

  /// Ensure the backing table exists. Safe to call repeatedly.
  fn initialize(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Persist a new record and return its store-assigned id.
  ///
  /// Fails with a constraint violation if either required name is empty;
  /// nothing is written in that case.
  fn add(
    &self,
    names: RecordNames,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + '_;

  /// All records in ascending id order.
  fn get_all(
    &self,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + '_;

  /// Retrieve a record by id. Returns `None` if not found.
  fn get_by_id(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Record>, Self::Error>> + Send + '_;

  /// Records whose last, first or middle name contains `term`, in ascending
  /// id order. An empty term matches every record.
  fn search<'a>(
    &'a self,
    term: &'a str,
  ) -> impl Future<Output = Result<Vec<Record>, Self::Error>> + Send + 'a;

  /// Overwrite the name fields of record `id`. `id` and `created_at` are
  /// never touched. Fails with not-found if no such record exists.
  fn update(
    &self,
    id: i64,
    names: RecordNames,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Permanently remove record `id`. Fails with not-found if absent.
  fn delete(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Number of records currently stored.
  fn count(&self) -> impl Future<Output = Result<u64, Self::Error>> + Send + '_;

  /// Release the underlying connection. Operations issued afterwards fail.
  fn shutdown(
    &self,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
