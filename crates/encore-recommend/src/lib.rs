//! Personalised event recommendations.
//!
//! The crate turns a user's interaction history into a ranked list of
//! upcoming events. It has three parts:
//!
//! - [`PreferenceAnalyzer`] condenses weighted history into a
//!   [`PreferenceProfile`].
//! - [`SimilarityScorer`] scores one event against another.
//! - [`Recommender`] fetches from a [`CatalogStore`], runs the two above and
//!   ranks the candidates, falling back to popularity for users without
//!   history.
//!
//! Everything is recomputed per request from a store snapshot; the only
//! optional state is the [`ProfileCache`].
//!
//! [`CatalogStore`]: encore_core::store::CatalogStore

pub mod cache;
pub mod error;
pub mod history;
pub mod profile;
pub mod ranker;
pub mod similarity;
pub mod weight;

pub use cache::ProfileCache;
pub use error::{Error, Result};
pub use profile::{PreferenceAnalyzer, PreferenceProfile};
pub use ranker::{
  MatchReasons, Ranking, Recommender, RecommenderConfig, ScoredCandidate, Strategy,
};
pub use similarity::SimilarityScorer;
