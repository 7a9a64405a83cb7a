//! matchday server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) layered under
//! `MATCHDAY_*` environment variables, opens the SQLite store, and serves the
//! REST API and WebSocket feed over HTTP.

mod settings;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use axum::{Json, Router, routing::get};
use clap::Parser;
use matchday_api::{AppState, MatchFeed, api_router};
use matchday_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use settings::{ServerConfig, expand_tilde};

#[derive(Parser)]
#[command(author, version, about = "matchday server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
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

  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let state = AppState::new(Arc::new(store), MatchFeed::new(server_cfg.feed_capacity));
  let app = app(state);

  let address = server_cfg.address();
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  let base_url = server_cfg.base_url();
  tracing::info!("Listening on {base_url}");
  tracing::info!("WebSocket feed on {}/ws", base_url.replacen("http", "ws", 1));

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// The full HTTP surface: a greeting at `/` plus the match API.
fn app(state: AppState<SqliteStore>) -> Router {
  Router::new()
    .route("/", get(root))
    .merge(api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn root() -> Json<Value> { Json(json!({ "message": "matchday is running" })) }
