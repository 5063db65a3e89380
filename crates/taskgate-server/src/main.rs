//! taskgate server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) with
//! `TASKGATE_*` environment overrides, opens an in-process SQLite store, and
//! serves the task API over HTTP.
//!
//! # Seeding
//!
//! ```text
//! cargo run -p taskgate-server --bin taskgate -- --seed
//! ```

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use taskgate_api::AppState;
use taskgate_core::{cipher::SummaryCipher, token::TokenService};
use taskgate_server::{ServerConfig, broker, seed};
use taskgate_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Taskgate task management API")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Insert demo users and tasks into an empty store and exit.
  #[arg(long)]
  seed: bool,
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

  let server_cfg =
    ServerConfig::load(&cli.config).context("failed to load configuration")?;

  let store_path = server_cfg.store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let cipher = SummaryCipher::new(&server_cfg.encryption_key);

  // Helper mode: seed and exit.
  if cli.seed {
    let written = seed::seed(&store, &cipher)
      .await
      .context("failed to seed store")?;
    if written {
      tracing::info!("Seeded {store_path:?}");
    } else {
      tracing::info!("Store already has users; nothing seeded");
    }
    return Ok(());
  }

  let tokens = TokenService::new(&server_cfg.api_secret)
    .context("failed to initialise token service")?;

  let (publisher, queue) = broker::channel(server_cfg.queue_capacity);
  broker::spawn_consumer(queue);

  // Build application state.
  let state = AppState {
    store:           Arc::new(store),
    tokens:          Arc::new(tokens),
    cipher:          Arc::new(cipher),
    publisher:       Arc::new(publisher),
    request_timeout: server_cfg.request_timeout(),
  };

  let app = taskgate_api::api_router(state);
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
