//! Server assembly for Encore: configuration, catalog seeding and the
//! top-level router.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use axum::Router;
use encore_core::{event::NewEvent, store::CatalogStore, user::NewUser};
use encore_recommend::{Recommender, RecommenderConfig};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ENCORE_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:            String,
  #[serde(default = "default_port")]
  pub port:            u16,
  #[serde(default = "default_store_path")]
  pub store_path:      PathBuf,
  /// JSON catalog loaded into the store at start-up.
  #[serde(default)]
  pub seed_path:       Option<PathBuf>,
  #[serde(default)]
  pub recommendations: RecommenderConfig,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 5000 }

fn default_store_path() -> PathBuf { PathBuf::from("encore.sqlite3") }

impl ServerConfig {
  /// Layer the optional TOML file at `path` under `ENCORE_*` environment
  /// variables (`__` separates nested keys).
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(
        config::Environment::with_prefix("ENCORE")
          .prefix_separator("_")
          .separator("__"),
      )
      .build()
      .context("failed to read config file")?;

    let cfg: Self = settings
      .try_deserialize()
      .context("failed to deserialise ServerConfig")?;
    cfg.validate()?;
    Ok(cfg)
  }

  fn validate(&self) -> anyhow::Result<()> {
    let r = &self.recommendations;
    anyhow::ensure!(r.max_limit >= 1, "recommendations.max_limit must be at least 1");
    anyhow::ensure!(
      (1..=r.max_limit).contains(&r.default_limit),
      "recommendations.default_limit must be between 1 and max_limit ({})",
      r.max_limit
    );
    Ok(())
  }
}

// ─── Seeding ──────────────────────────────────────────────────────────────────

/// A catalog snapshot to load into an empty store.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Seed {
  pub users:  Vec<NewUser>,
  pub events: Vec<NewEvent>,
}

impl Seed {
  pub fn from_file(path: &Path) -> anyhow::Result<Self> {
    let text = std::fs::read_to_string(path)
      .with_context(|| format!("failed to read seed file {path:?}"))?;
    serde_json::from_str(&text).with_context(|| format!("malformed seed file {path:?}"))
  }

  /// Insert every user and event into `store` if it holds neither yet.
  ///
  /// Returns `(users, events)` inserted, or `None` when the store was already
  /// populated and nothing was written.
  pub async fn apply<S: CatalogStore>(
    self,
    store: &S,
  ) -> anyhow::Result<Option<(usize, usize)>> {
    if !store
      .is_empty()
      .await
      .context("failed to inspect store before seeding")?
    {
      return Ok(None);
    }

    let (n_users, n_events) = (self.users.len(), self.events.len());
    for user in self.users {
      let name = user.username.clone();
      store
        .add_user(user)
        .await
        .with_context(|| format!("failed to seed user {name:?}"))?;
    }
    for event in self.events {
      let title = event.title.clone();
      store
        .add_event(event)
        .await
        .with_context(|| format!("failed to seed event {title:?}"))?;
    }
    Ok(Some((n_users, n_events)))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Wrap the API router for `store` with request tracing.
pub fn app<S>(store: Arc<S>, config: &ServerConfig) -> Router
where
  S: CatalogStore + 'static,
{
  let recommender = Arc::new(Recommender::new(store, config.recommendations.clone()));
  encore_api::api_router(recommender).layer(TraceLayer::new_for_http())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
