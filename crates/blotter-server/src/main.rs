//! blotter server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens an
//! in-process SQLite store, and serves the JSON API. The scrape and
//! classify maintenance passes are also exposed as subcommands so
//! operators (and cron) can run them without the HTTP surface.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use blotter_api::{ApiState, api_router, scrape::expand_filters};
use blotter_core::{classify::run_classification, mode::Mode};
use blotter_scrape::{ClientConfig, RecordClient, ScrapeOptions, run_scrape};
use blotter_store_sqlite::SqliteStore;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "blotter roster-quiz server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the JSON API (the default when no subcommand is given).
  Serve,

  /// Run one scrape pass against the upstream roster.
  Scrape {
    /// Filter letters: empty for a..z, a single letter for that letter
    /// through z, or several letters for exactly those.
    #[arg(long, default_value = "")]
    filters: String,

    /// Stop after this many roster rows; 0 means all.
    #[arg(long, default_value_t = 0)]
    limit: u32,

    /// Clear the whole roster first.
    #[arg(long)]
    reset: bool,

    /// Keep only charges containing this string (case-insensitive).
    #[arg(long)]
    contains: Option<String>,
  },

  /// Rebuild the category marker sets for one mode.
  Classify {
    /// One of: child, murder, drugs.
    mode: Mode,
  },
}

// ─── Configuration ───────────────────────────────────────────────────────────

/// Runtime configuration, deserialised from `config.toml` and `BLOTTER_*`
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
struct ServerConfig {
  #[serde(default = "default_host")]
  host:       String,
  #[serde(default = "default_port")]
  port:       u16,
  #[serde(default = "default_store_path")]
  store_path: PathBuf,
  /// Base URL of the upstream jail-records service.
  #[serde(default = "default_base_url")]
  base_url:   String,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8320 }
fn default_store_path() -> PathBuf { PathBuf::from("blotter.db") }
fn default_base_url() -> String {
  "https://netapps.ocfl.net/BestJail/Home".to_string()
}

// ─── Entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config.clone()).required(false))
    .add_source(config::Environment::with_prefix("BLOTTER"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let client = RecordClient::new(ClientConfig {
    base_url: server_cfg.base_url.clone(),
  })
  .context("failed to build record client")?;

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve(server_cfg, store, client).await,

    Command::Scrape { filters, limit, reset, contains } => {
      let options = ScrapeOptions {
        filters: expand_filters(&filters),
        limit: if limit == 0 { None } else { Some(limit) },
        reset,
        charge_contains: contains,
      };
      let stats = run_scrape(&client, &store, &options).await?;
      println!(
        "scanned={} created={} updated={}",
        stats.scanned, stats.created, stats.updated
      );
      Ok(())
    }

    Command::Classify { mode } => {
      let report = run_classification(&store, mode).await?;
      println!("{}", serde_json::to_string(&report)?);
      Ok(())
    }
  }
}

async fn serve(
  cfg: ServerConfig,
  store: SqliteStore,
  client: RecordClient,
) -> anyhow::Result<()> {
  let state = ApiState {
    store: Arc::new(store),
    client,
  };
  let app = api_router(state)
    .layer(tower_http::trace::TraceLayer::new_for_http());

  let address = format!("{}:{}", cfg.host, cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;
  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
