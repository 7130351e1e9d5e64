//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | All records, ascending id |
//! | `POST`   | `/users` | Body: [`UserBody`]; returns 201 + new id |
//! | `GET`    | `/users/search` | `?q=term`, empty term matches all |
//! | `GET`    | `/users/count` | Total number of records |
//! | `GET`    | `/users/{id}` | Single record; 404 if not found |
//! | `PUT`    | `/users/{id}` | Body: [`UserBody`]; rewrites the names |
//! | `DELETE` | `/users/{id}` | 404 if not found |

use std::sync::Arc;

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use roster_core::{record::RecordNames, store::RecordStore};
use serde_json::{Value, json};

use crate::{envelope, error::ApiError};

// ─── Request parsing ──────────────────────────────────────────────────────────

/// JSON body accepted by `POST /users` and `PUT /users/{id}`.
///
/// Fields are read leniently: strings are taken as-is, numbers and booleans
/// by their JSON text, and anything else (missing, `null`, arrays, objects,
/// or a body that is not an object at all) as absent. Absent names default
/// to the empty string, which the store then refuses for last/first name.
#[derive(Debug, Default)]
pub struct UserBody {
  pub last_name:   Option<String>,
  pub first_name:  Option<String>,
  pub middle_name: Option<String>,
}

impl UserBody {
  pub fn from_json(value: &Value) -> Self {
    let field = |key: &str| value.get(key).and_then(field_text);
    UserBody {
      last_name:   field("last_name"),
      first_name:  field("first_name"),
      middle_name: field("middle_name"),
    }
  }
}

fn field_text(value: &Value) -> Option<String> {
  match value {
    Value::String(s) => Some(s.clone()),
    Value::Number(n) => Some(n.to_string()),
    Value::Bool(b) => Some(b.to_string()),
    Value::Null | Value::Array(_) | Value::Object(_) => None,
  }
}

impl From<UserBody> for RecordNames {
  fn from(b: UserBody) -> Self {
    RecordNames {
      last_name:   b.last_name.unwrap_or_default(),
      first_name:  b.first_name.unwrap_or_default(),
      middle_name: b.middle_name.filter(|m| !m.is_empty()),
    }
  }
}

/// Only a body that is not JSON at all is malformed.
fn body(body: Result<Json<Value>, JsonRejection>) -> Result<RecordNames, ApiError> {
  let Json(value) = body.map_err(|r| ApiError::MalformedRequest(r.body_text()))?;
  Ok(UserBody::from_json(&value).into())
}

/// The first `q` parameter wins; no `q` searches for the empty term.
fn search_term(
  params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<String, ApiError> {
  let Query(params) = params.map_err(|r| ApiError::MalformedRequest(r.body_text()))?;
  Ok(
    params
      .into_iter()
      .find_map(|(key, value)| (key == "q").then_some(value))
      .unwrap_or_default(),
  )
}

fn user_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
  let Path(id) = id.map_err(|r| ApiError::MalformedRequest(r.body_text()))?;
  Ok(id)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(State(store): State<Arc<S>>) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let records = store
    .get_all()
    .await
    .map_err(|e| ApiError::store("load users", None, e))?;
  Ok(Json(envelope::success([("users", envelope::user_rows(&records))])))
}

// ─── Search ───────────────────────────────────────────────────────────────────

/// `GET /users/search[?q=term]`
pub async fn search<S>(
  State(store): State<Arc<S>>,
  params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let term = search_term(params)?;
  let records = store
    .search(&term)
    .await
    .map_err(|e| ApiError::store("search users", None, e))?;
  Ok(Json(envelope::success([("users", envelope::user_rows(&records))])))
}

// ─── Count ────────────────────────────────────────────────────────────────────

/// `GET /users/count`
pub async fn count<S>(State(store): State<Arc<S>>) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let count = store
    .count()
    .await
    .map_err(|e| ApiError::store("count users", None, e))?;
  Ok(Json(envelope::success([("count", json!(count))])))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /users` — returns 201 + the new id.
pub async fn create<S>(
  State(store): State<Arc<S>>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let names = body(payload)?;
  let id = store
    .add(names)
    .await
    .map_err(|e| ApiError::store("add user", None, e))?;
  Ok((
    StatusCode::CREATED,
    Json(envelope::success([("message", json!("User added")), ("id", json!(id))])),
  ))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let id = user_id(id)?;
  let record = store
    .get_by_id(id)
    .await
    .map_err(|e| ApiError::store("load user", Some(id), e))?
    .ok_or_else(|| ApiError::NotFound(format!("User {id} not found")))?;
  Ok(Json(envelope::success([("user", envelope::user_row(&record))])))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT /users/{id}` — body is the replacement [`UserBody`].
pub async fn update<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let id = user_id(id)?;
  let names = body(payload)?;
  store
    .update(id, names)
    .await
    .map_err(|e| ApiError::store("update user", Some(id), e))?;
  Ok(Json(envelope::success([("message", json!("User updated"))])))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}`
pub async fn delete<S>(
  State(store): State<Arc<S>>,
  id: Result<Path<i64>, PathRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RecordStore,
{
  let id = user_id(id)?;
  store
    .delete(id)
    .await
    .map_err(|e| ApiError::store("delete user", Some(id), e))?;
  Ok(Json(envelope::success([("message", json!("User deleted"))])))
}
