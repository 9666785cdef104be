//! Handlers for `/api/interactions` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/users/{user_id}/interactions` | History joined with events, newest first |
//! | `POST` | `/api/interactions` | Body: [`NewInteraction`]; returns 201 + stored record |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use encore_core::{
  id::UserId,
  interaction::{HistoryEntry, NewInteraction},
  store::CatalogStore,
};
use encore_recommend::Recommender;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/users/{user_id}/interactions`
pub async fn list<S>(
  State(recommender): State<Arc<Recommender<S>>>,
  Path(raw_id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError>
where
  S: CatalogStore + 'static,
{
  let user_id: UserId = raw_id.parse()?;
  let store = recommender.store();

  store
    .get_user(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))?;

  let history = store
    .get_user_history(user_id)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(history))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /api/interactions` — returns 201 + the stored
/// [`InteractionRecord`](encore_core::interaction::InteractionRecord).
/// An `occurredAt` in the future is a 400.
pub async fn create<S>(
  State(recommender): State<Arc<Recommender<S>>>,
  Json(body): Json<NewInteraction>,
) -> Result<impl IntoResponse, ApiError>
where
  S: CatalogStore + 'static,
{
  body.validate(Utc::now())?;
  let store = recommender.store();

  store
    .get_user(body.user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("user {} not found", body.user_id)))?;
  store
    .get_event(body.event_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("event {} not found", body.event_id)))?;

  let user_id = body.user_id;
  let record = store
    .record_interaction(body)
    .await
    .map_err(ApiError::store)?;
  recommender.invalidate(user_id);

  Ok((StatusCode::CREATED, Json(record)))
}
