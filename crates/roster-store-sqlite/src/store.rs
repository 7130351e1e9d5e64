//! [`SqliteStore`] — the SQLite implementation of [`RecordStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;

use roster_core::{
  record::{Record, RecordNames},
  store::RecordStore,
};

use crate::{
  encode::RawRecord,
  schema::{SCHEMA, SELECT_RECORD},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Roster record store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. A store
/// whose file could not be opened has no connection at all and fails every
/// operation with [`Error::ConnectionFailure`].
#[derive(Clone)]
pub struct SqliteStore {
  pub(crate) conn: Option<tokio_rusqlite::Connection>,
  location:        String,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path)
      .await
      .map_err(|e| Error::ConnectionFailure(format!("{}: {e}", path.display())))?;
    let store = Self { conn: Some(conn), location: path.display().to_string() };
    store.initialize().await?;
    tracing::info!(location = %store.location, "record store opened");
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn: Some(conn), location: ":memory:".to_owned() };
    store.initialize().await?;
    Ok(store)
  }

  /// Like [`SqliteStore::open`], but never fails.
  ///
  /// Open or schema errors are logged and the returned store runs degraded:
  /// its operations keep failing instead of the process exiting.
  pub async fn open_or_degraded(path: impl AsRef<Path>) -> Self {
    let path = path.as_ref();
    let location = path.display().to_string();

    let conn = match tokio_rusqlite::Connection::open(path).await {
      Ok(conn) => conn,
      Err(e) => {
        tracing::error!(%location, error = %e, "cannot open record store, running degraded");
        return Self { conn: None, location };
      }
    };

    let store = Self { conn: Some(conn), location };
    match store.initialize().await {
      Ok(()) => tracing::info!(location = %store.location, "record store opened"),
      Err(e) => tracing::error!(
        location = %store.location,
        error = %e,
        "cannot initialise record store, running degraded"
      ),
    }
    store
  }

  /// Where this store lives, for diagnostics.
  pub fn location(&self) -> &str { &self.location }

  fn conn(&self) -> Result<&tokio_rusqlite::Connection> {
    self
      .conn
      .as_ref()
      .ok_or_else(|| Error::ConnectionFailure(format!("{}: not connected", self.location)))
  }

  async fn select_records(
    &self,
    sql: String,
    term: Option<String>,
  ) -> Result<Vec<Record>> {
    let raws: Vec<RawRecord> = self
      .conn()?
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = match term {
          Some(t) => stmt
            .query_map(rusqlite::params![t], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
          None => stmt
            .query_map([], RawRecord::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?,
        };
        Ok(rows)
      })
      .await?;

    // A row that cannot be decoded is left out rather than failing the read.
    Ok(
      raws
        .into_iter()
        .filter_map(|raw| {
          let id = raw.id;
          raw
            .into_record()
            .inspect_err(|e| tracing::warn!(id, error = %e, "skipping undecodable record"))
            .ok()
        })
        .collect(),
    )
  }

  async fn create_table(&self) -> Result<()> {
    self
      .conn()?
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn insert(&self, names: RecordNames) -> Result<i64> {
    names.validate()?;
    let middle_name = names.middle_name_or_empty().to_owned();
    let RecordNames { last_name, first_name, .. } = names;

    let id = self
      .conn()?
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (last_name, first_name, middle_name) VALUES (?1, ?2, ?3)",
          rusqlite::params![last_name, first_name, middle_name],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await?;

    tracing::info!(id, "record added");
    Ok(id)
  }

  async fn rewrite(&self, id: i64, names: RecordNames) -> Result<()> {
    names.validate()?;
    let middle_name = names.middle_name_or_empty().to_owned();
    let RecordNames { last_name, first_name, .. } = names;

    let changed = self
      .conn()?
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET last_name = ?1, first_name = ?2, middle_name = ?3
           WHERE id = ?4",
          rusqlite::params![last_name, first_name, middle_name, id],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(roster_core::Error::NotFound(id).into());
    }
    tracing::info!(id, "record updated");
    Ok(())
  }

  async fn remove(&self, id: i64) -> Result<()> {
    let changed = self
      .conn()?
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM users WHERE id = ?1", rusqlite::params![id])?)
      })
      .await?;

    if changed == 0 {
      return Err(roster_core::Error::NotFound(id).into());
    }
    tracing::info!(id, "record deleted");
    Ok(())
  }

  async fn select_one(&self, id: i64) -> Result<Option<Record>> {
    let raw: Option<RawRecord> = self
      .conn()?
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("{SELECT_RECORD} WHERE id = ?1"),
            rusqlite::params![id],
            RawRecord::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawRecord::into_record).transpose()
  }

  async fn select_count(&self) -> Result<u64> {
    let n: i64 = self
      .conn()?
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }

  async fn close(&self) -> Result<()> {
    self.conn()?.clone().close().await?;
    tracing::info!(location = %self.location, "record store closed");
    Ok(())
  }
}

/// Log a failed operation before handing the outcome back to the caller.
fn logged<T>(op: &'static str, result: Result<T>) -> Result<T> {
  if let Err(e) = &result {
    tracing::warn!(op, error = %e, "record store operation failed");
  }
  result
}

// ─── RecordStore impl ────────────────────────────────────────────────────────

impl RecordStore for SqliteStore {
  type Error = Error;

  async fn initialize(&self) -> Result<()> {
    logged("initialize", self.create_table().await)
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn add(&self, names: RecordNames) -> Result<i64> {
    logged("add", self.insert(names).await)
  }

  async fn update(&self, id: i64, names: RecordNames) -> Result<()> {
    logged("update", self.rewrite(id, names).await)
  }

  async fn delete(&self, id: i64) -> Result<()> {
    logged("delete", self.remove(id).await)
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  async fn get_all(&self) -> Result<Vec<Record>> {
    let sql = format!("{SELECT_RECORD} ORDER BY id");
    logged("get_all", self.select_records(sql, None).await)
  }

  async fn get_by_id(&self, id: i64) -> Result<Option<Record>> {
    logged("get_by_id", self.select_one(id).await)
  }

  async fn search(&self, term: &str) -> Result<Vec<Record>> {
    // `instr` is an exact, case-sensitive substring test; unlike LIKE it
    // gives no special meaning to `%` or `_` in the term.
    let sql = format!(
      "{SELECT_RECORD}
       WHERE instr(last_name, ?1) > 0
          OR instr(first_name, ?1) > 0
          OR instr(IFNULL(middle_name, ''), ?1) > 0
       ORDER BY id"
    );
    logged("search", self.select_records(sql, Some(term.to_owned())).await)
  }

  async fn count(&self) -> Result<u64> {
    logged("count", self.select_count().await)
  }

  async fn shutdown(&self) -> Result<()> {
    logged("shutdown", self.close().await)
  }
}
