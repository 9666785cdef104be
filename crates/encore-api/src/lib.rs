//! JSON REST API for Encore recommendations.
//!
//! Exposes an axum [`Router`] backed by a [`Recommender`] over any
//! [`encore_core::store::CatalogStore`]. Auth, TLS, and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = encore_api::api_router(Arc::new(Recommender::new(store, config)));
//! ```

pub mod error;
pub mod interactions;
pub mod recommendations;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use encore_core::store::CatalogStore;
use encore_recommend::Recommender;

pub use error::ApiError;

/// Build the API router for `recommender`.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(recommender: Arc<Recommender<S>>) -> Router<()>
where
  S: CatalogStore + 'static,
{
  Router::new()
    // Recommendations
    .route("/recommendations/{user_id}", get(recommendations::handler::<S>))
    .route(
      "/api/users/{user_id}/recommendations",
      get(recommendations::handler::<S>),
    )
    // Interactions
    .route("/api/users/{user_id}/interactions", get(interactions::list::<S>))
    .route("/api/interactions", post(interactions::create::<S>))
    .with_state(recommender)
}
