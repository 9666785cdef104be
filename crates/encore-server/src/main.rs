//! encore-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite catalog store, optionally seeds it, and serves the recommendation
//! API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use encore_server::{Seed, ServerConfig, app, expand_tilde};
use encore_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Encore event recommendation server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// JSON catalog (`{"users": [...], "events": [...]}`) to load at start-up.
  /// Overrides `seed_path` from the config file.
  #[arg(long)]
  seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = ServerConfig::load(&cli.config)?;

  // Open SQLite store.
  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  if let Some(seed_path) = cli.seed.as_ref().or(server_cfg.seed_path.as_ref()) {
    let seed_path = expand_tilde(seed_path);
    match Seed::from_file(&seed_path)?.apply(&store).await? {
      Some((users, events)) => {
        tracing::info!(users, events, "seeded catalog from {seed_path:?}")
      }
      None => tracing::info!("store already populated; skipping seed {seed_path:?}"),
    }
  }

  let app = app(Arc::new(store), &server_cfg);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
