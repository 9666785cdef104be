//! Handlers for recommendation endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/recommendations/{user_id}` | Optional `?limit=`; default from config |
//! | `GET`  | `/api/users/{user_id}/recommendations` | Same handler |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use encore_core::{id::UserId, store::CatalogStore};
use encore_recommend::{Recommender, ScoredCandidate};
use serde::Deserialize;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
  /// Kept as text so a malformed value yields our JSON error body.
  pub limit: Option<String>,
}

fn parse_limit(raw: Option<&str>, default: usize, max: usize) -> Result<usize, ApiError> {
  let Some(raw) = raw else {
    return Ok(default);
  };
  match raw.trim().parse::<usize>() {
    Ok(n) if (1..=max).contains(&n) => Ok(n),
    _ => Err(ApiError::BadRequest(format!(
      "limit must be an integer between 1 and {max}, got {raw:?}"
    ))),
  }
}

/// `GET /recommendations/{user_id}[?limit=N]` — ranked events, most relevant
/// first.
pub async fn handler<S>(
  State(recommender): State<Arc<Recommender<S>>>,
  Path(raw_id): Path<String>,
  Query(params): Query<RecommendParams>,
) -> Result<Json<Vec<ScoredCandidate>>, ApiError>
where
  S: CatalogStore + 'static,
{
  // Validate before touching the store.
  let user_id: UserId = raw_id.parse()?;
  let config = recommender.config();
  let limit = parse_limit(params.limit.as_deref(), config.default_limit, config.max_limit)?;

  let ranking = recommender.recommend(user_id, limit).await?;
  Ok(Json(ranking.candidates))
}
