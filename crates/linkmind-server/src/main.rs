//! linkmind-server binary.
//!
//! Loads [`ServerConfig`] (see `--config`), opens the SQLite account store
//! and serves the entitlement API. `--hash-password` prints the argon2 PHC
//! string to paste into `auth_password_hash`.

use std::{path::PathBuf, sync::Arc};

use anyhow::{Context as _, anyhow};
use argon2::{Argon2, PasswordHasher, password_hash::SaltString};
use clap::Parser;
use linkmind_core::service::EntitlementService;
use linkmind_server::{AppState, ServerConfig};
use linkmind_store_sqlite::SqliteStore;
use rand_core::OsRng;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "LinkMind entitlement server")]
struct Cli {
  /// TOML config file; `LINKMIND_*` variables override its values.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Read a password from stdin, print its argon2 hash and exit.
  #[arg(long)]
  hash_password: bool,
}

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
  if cli.hash_password {
    println!("{}", hash_password(&prompt_password()?)?);
    return Ok(());
  }

  let cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("loading config from {}", cli.config.display()))?;
  let secret_code = cfg
    .secret_code()
    .context("secret_code must be set to a non-empty value")?;

  let store_path = cfg.resolved_store_path();
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("opening account store at {}", store_path.display()))?;

  let state = AppState {
    service: Arc::new(EntitlementService::new(store, secret_code)),
    auth:    Arc::new(cfg.auth()),
  };

  let address = format!("{}:{}", cfg.host, cfg.port);
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("binding {address}"))?;
  tracing::info!(store = %store_path.display(), %address, "linkmind-server ready");

  axum::serve(listener, linkmind_server::router(state))
    .await
    .context("server error")
}

fn hash_password(password: &str) -> anyhow::Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| anyhow!("hashing password: {e}"))
}

fn prompt_password() -> anyhow::Result<String> {
  use std::io::{self, BufRead, Write};
  eprint!("Password: ");
  io::stderr().flush().ok();
  let mut line = String::new();
  io::stdin().lock().read_line(&mut line)?;
  Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
