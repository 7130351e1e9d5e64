//! Integration tests for `SqliteStore` against an in-memory database.

use roster_core::{
  record::RecordNames,
  store::{Classify, FailureKind, RecordStore},
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn names(last: &str, first: &str, middle: &str) -> RecordNames {
  let middle = (!middle.is_empty()).then(|| middle.to_owned());
  RecordNames::new(last, first, middle)
}

async fn seed(s: &SqliteStore) -> (i64, i64) {
  let ivanov = s.add(names("Ivanov", "Ivan", "Ivanovich")).await.unwrap();
  let petrov = s.add(names("Petrov", "Petr", "Petrovich")).await.unwrap();
  (ivanov, petrov)
}

// ─── Schema ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn initialize_is_idempotent() {
  let s = store().await;
  s.add(names("Ivanov", "Ivan", "")).await.unwrap();

  s.initialize().await.unwrap();
  s.initialize().await.unwrap();

  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn check_constraint_backs_up_validation() {
  let s = store().await;
  let conn = s.conn.clone().unwrap();

  let err = conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO users (last_name, first_name, middle_name) VALUES ('', 'Ivan', '')",
        [],
      )?;
      Ok(())
    })
    .await
    .map_err(Error::from)
    .unwrap_err();

  assert_eq!(err.kind(), FailureKind::ConstraintViolation);
  assert_eq!(s.count().await.unwrap(), 0);
}

// ─── Add / get ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_by_id() {
  let s = store().await;

  let id = s.add(names("Ivanov", "Ivan", "Ivanovich")).await.unwrap();
  let record = s.get_by_id(id).await.unwrap().expect("record exists");

  assert_eq!(record.id, id);
  assert_eq!(record.last_name, "Ivanov");
  assert_eq!(record.first_name, "Ivan");
  assert_eq!(record.middle_name.as_deref(), Some("Ivanovich"));
}

#[tokio::test]
async fn add_without_middle_name_reads_back_absent() {
  let s = store().await;

  let id = s.add(names("Ivanov", "Ivan", "")).await.unwrap();
  let record = s.get_by_id(id).await.unwrap().unwrap();
  assert_eq!(record.middle_name, None);

  // The column holds '' rather than NULL.
  let conn = s.conn.clone().unwrap();
  let stored: Option<String> = conn
    .call(move |conn| {
      Ok(conn.query_row(
        "SELECT middle_name FROM users WHERE id = ?1",
        [id],
        |row| row.get(0),
      )?)
    })
    .await
    .unwrap();
  assert_eq!(stored.as_deref(), Some(""));
}

#[tokio::test]
async fn get_by_id_missing_returns_none() {
  let s = store().await;
  assert!(s.get_by_id(42).await.unwrap().is_none());
}

#[tokio::test]
async fn add_with_empty_last_name_is_rejected() {
  let s = store().await;

  let err = s.add(names("", "Ivan", "Ivanovich")).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::ConstraintViolation);
  assert_eq!(s.count().await.unwrap(), 0);
}

#[tokio::test]
async fn add_with_empty_first_name_is_rejected() {
  let s = store().await;
  seed(&s).await;

  let err = s.add(names("Sidorova", "", "")).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::ConstraintViolation);
  assert_eq!(s.count().await.unwrap(), 2);
}

#[tokio::test]
async fn ids_are_never_reused() {
  let s = store().await;
  let (_, petrov) = seed(&s).await;

  s.delete(petrov).await.unwrap();
  let next = s.add(names("Sidorova", "Anna", "Sergeevna")).await.unwrap();

  assert!(next > petrov, "id {next} reused after deleting {petrov}");
}

// ─── List / search ───────────────────────────────────────────────────────────

#[tokio::test]
async fn get_all_empty() {
  let s = store().await;
  assert!(s.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn empty_search_matches_get_all() {
  let s = store().await;
  seed(&s).await;
  s.add(names("Sidorova", "Anna", "")).await.unwrap();

  let all = s.get_all().await.unwrap();
  let found = s.search("").await.unwrap();
  assert_eq!(found, all);
}

#[tokio::test]
async fn search_matches_any_name_field() {
  let s = store().await;
  let (ivanov, petrov) = seed(&s).await;
  let sidorova = s.add(names("Sidorova", "Anna", "Sergeevna")).await.unwrap();

  let ids = |records: Vec<roster_core::record::Record>| {
    records.into_iter().map(|r| r.id).collect::<Vec<_>>()
  };

  assert_eq!(ids(s.search("Sidor").await.unwrap()), vec![sidorova]);
  assert_eq!(ids(s.search("Anna").await.unwrap()), vec![sidorova]);
  assert_eq!(ids(s.search("geev").await.unwrap()), vec![sidorova]);
  assert_eq!(ids(s.search("vich").await.unwrap()), vec![ivanov, petrov]);

  // Every hit really contains the term; every miss really does not.
  let term = "ov";
  let hits = ids(s.search(term).await.unwrap());
  for record in s.get_all().await.unwrap() {
    let contains = record.last_name.contains(term)
      || record.first_name.contains(term)
      || record.middle_name.as_deref().unwrap_or_default().contains(term);
    assert_eq!(hits.contains(&record.id), contains, "record {}", record.id);
  }
}

#[tokio::test]
async fn search_is_case_sensitive() {
  let s = store().await;
  seed(&s).await;

  assert!(s.search("ivan").await.unwrap().is_empty());
  assert_eq!(s.search("Ivan").await.unwrap().len(), 1);
}

#[tokio::test]
async fn search_treats_wildcards_literally() {
  let s = store().await;
  seed(&s).await;

  assert!(s.search("%").await.unwrap().is_empty());
  assert!(s.search("_").await.unwrap().is_empty());
}

#[tokio::test]
async fn search_no_match_returns_empty() {
  let s = store().await;
  seed(&s).await;
  assert!(s.search("Smith").await.unwrap().is_empty());
}

#[tokio::test]
async fn undecodable_rows_are_skipped_by_list_and_search() {
  let s = store().await;
  s.add(names("Ivanov", "Ivan", "")).await.unwrap();
  let conn = s.conn.clone().unwrap();
  conn
    .call(|conn| {
      conn.execute(
        "INSERT INTO users (last_name, first_name, middle_name, created_at) \
         VALUES ('Ivanova', 'Anna', '', NULL)",
        [],
      )?;
      Ok(())
    })
    .await
    .unwrap();
  s.add(names("Petrov", "Petr", "")).await.unwrap();

  let all: Vec<i64> = s.get_all().await.unwrap().iter().map(|r| r.id).collect();
  assert_eq!(all, vec![1, 3]);

  let found: Vec<i64> = s.search("Ivanov").await.unwrap().iter().map(|r| r.id).collect();
  assert_eq!(found, vec![1]);
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn update_preserves_id_and_created_at() {
  let s = store().await;
  let (_, petrov) = seed(&s).await;
  let before = s.get_by_id(petrov).await.unwrap().unwrap();

  s.update(petrov, names("Petrova", "Anna", "Sergeevna"))
    .await
    .unwrap();

  let after = s.get_by_id(petrov).await.unwrap().unwrap();
  assert_eq!(after.id, before.id);
  assert_eq!(after.created_at, before.created_at);
  assert_eq!(after.last_name, "Petrova");
  assert_eq!(after.first_name, "Anna");
  assert_eq!(after.middle_name.as_deref(), Some("Sergeevna"));
}

#[tokio::test]
async fn update_can_clear_middle_name() {
  let s = store().await;
  let (ivanov, _) = seed(&s).await;

  s.update(ivanov, names("Ivanov", "Ivan", "")).await.unwrap();
  let record = s.get_by_id(ivanov).await.unwrap().unwrap();
  assert_eq!(record.middle_name, None);
}

#[tokio::test]
async fn update_missing_returns_not_found() {
  let s = store().await;
  seed(&s).await;

  let err = s.update(99, names("Petrova", "Anna", "")).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::NotFound);
  assert_eq!(s.count().await.unwrap(), 2);
}

#[tokio::test]
async fn update_with_empty_name_is_rejected_and_leaves_record() {
  let s = store().await;
  let (ivanov, _) = seed(&s).await;

  let err = s.update(ivanov, names("Ivanov", "", "")).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::ConstraintViolation);

  let record = s.get_by_id(ivanov).await.unwrap().unwrap();
  assert_eq!(record.first_name, "Ivan");
}

// ─── Delete / count ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_missing_returns_not_found() {
  let s = store().await;
  seed(&s).await;

  let err = s.delete(99).await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::NotFound);
  assert_eq!(s.count().await.unwrap(), 2);
}

#[tokio::test]
async fn repeated_delete_keeps_reporting_not_found() {
  let s = store().await;
  let (ivanov, _) = seed(&s).await;

  s.delete(ivanov).await.unwrap();
  for _ in 0..2 {
    let err = s.delete(ivanov).await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NotFound);
  }
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn count_tracks_successful_adds_and_deletes() {
  let s = store().await;
  let mut expected = 0u64;

  for (last, first) in [("A", "a"), ("", "b"), ("C", "c"), ("D", ""), ("E", "e")] {
    if s.add(names(last, first, "")).await.is_ok() {
      expected += 1;
    }
    assert_eq!(s.count().await.unwrap(), expected);
  }

  for id in [1, 1, 2, 7] {
    if s.delete(id).await.is_ok() {
      expected -= 1;
    }
    assert_eq!(s.count().await.unwrap(), expected);
  }
  assert_eq!(expected, 1);
}

// ─── Scenarios ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_search_delete_scenario() {
  let s = store().await;
  let (ivanov, petrov) = seed(&s).await;
  assert_eq!((ivanov, petrov), (1, 2));

  let all = s.get_all().await.unwrap();
  assert_eq!(all.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2]);
  assert_eq!(all[0].last_name, "Ivanov");
  assert_eq!(all[1].last_name, "Petrov");

  let found = s.search("Ivan").await.unwrap();
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].id, 1);

  assert_eq!(s.count().await.unwrap(), 2);

  s.delete(1).await.unwrap();
  let all = s.get_all().await.unwrap();
  assert_eq!(all.len(), 1);
  assert_eq!(all[0].id, 2);
  assert_eq!(s.count().await.unwrap(), 1);

  let before = all[0].clone();
  s.update(2, names("Petrova", "Anna", "Sergeevna")).await.unwrap();
  let after = s.get_by_id(2).await.unwrap().unwrap();
  assert_eq!(after.full_name(), "Petrova Anna Sergeevna");
  assert_eq!(after.created_at, before.created_at);
}

// ─── Connection lifecycle ────────────────────────────────────────────────────

#[tokio::test]
async fn reopening_a_file_keeps_records() {
  let dir = std::env::temp_dir().join(format!("roster-{}", std::process::id()));
  std::fs::create_dir_all(&dir).unwrap();
  let path = dir.join("reopen.db");
  let _ = std::fs::remove_file(&path);

  let s = SqliteStore::open(&path).await.unwrap();
  seed(&s).await;
  s.shutdown().await.unwrap();

  let s = SqliteStore::open(&path).await.unwrap();
  assert_eq!(s.count().await.unwrap(), 2);
  s.shutdown().await.unwrap();

  std::fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn operations_after_shutdown_fail() {
  let s = store().await;
  seed(&s).await;

  s.shutdown().await.unwrap();

  let err = s.count().await.unwrap_err();
  assert_eq!(err.kind(), FailureKind::ConnectionFailure);
}

#[tokio::test]
async fn open_unreachable_path_is_connection_failure() {
  let path = "/nonexistent-roster-dir/nested/users.db";

  let err = SqliteStore::open(path).await.err().expect("open must fail");
  assert_eq!(err.kind(), FailureKind::ConnectionFailure);
}

#[tokio::test]
async fn degraded_store_fails_every_operation() {
  let s = SqliteStore::open_or_degraded("/nonexistent-roster-dir/nested/users.db").await;

  assert_eq!(s.get_all().await.unwrap_err().kind(), FailureKind::ConnectionFailure);
  assert_eq!(s.count().await.unwrap_err().kind(), FailureKind::ConnectionFailure);
  assert_eq!(
    s.add(names("Ivanov", "Ivan", "")).await.unwrap_err().kind(),
    FailureKind::ConnectionFailure
  );
  assert_eq!(s.delete(1).await.unwrap_err().kind(), FailureKind::ConnectionFailure);
}
