//! `linkmind`: command-line client for the LinkMind entitlement server.
//!
//! # Usage
//!
//! ```
//! linkmind --url http://localhost:8080 --user admin --password secret register "Ana Sousa"
//! linkmind --config ~/.config/linkmind/config.toml status ana_sousa
//! ```

mod client;
mod render;

use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use client::{ApiClient, ApiConfig};
use linkmind_core::{
  account::{PlanType, SubscriptionStatus},
  service::RedemptionOutcome,
};
use serde::Deserialize;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "linkmind", about = "Manage LinkMind premium entitlements")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<std::path::PathBuf>,

  /// Base URL of the linkmind server (default: http://localhost:8080).
  #[arg(long, env = "LINKMIND_URL")]
  url: Option<String>,

  /// API username.
  #[arg(long, env = "LINKMIND_USER")]
  user: Option<String>,

  /// API password (plaintext).
  #[arg(long, env = "LINKMIND_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create an account and start its 7-day trial.
  Register {
    /// Display name; normalized into the account id.
    display_name: String,
  },
  /// Show what the dashboard would render for an account.
  Status {
    account: String,
    /// Evaluate at this RFC 3339 instant instead of now.
    #[arg(long)]
    as_of: Option<DateTime<Utc>>,
  },
  /// Show the stored account record.
  Show { account: String },
  /// Record a confirmed PayPal subscription.
  Activate {
    account:         String,
    #[arg(long)]
    subscription_id: String,
    /// `monthly` or `yearly`.
    #[arg(long)]
    plan:            PlanType,
  },
  /// Record that the PayPal subscription is no longer active.
  Cancel { account: String },
  /// Redeem the override code on an account.
  Redeem { account: String, code: String },
  /// List accounts, optionally filtered by status.
  List {
    #[arg(long)]
    status: Option<SubscriptionStatus>,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
  let args = Args::parse();

  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // Flags and environment override the config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;
  run(&client, args.command).await
}

async fn run(client: &ApiClient, command: Command) -> Result<ExitCode> {
  match command {
    Command::Register { display_name } => {
      let record = client.register(&display_name).await?;
      print!("{}", render::account(&record));
    }
    Command::Status { account, as_of } => {
      let report = client.entitlement(&account, as_of).await?;
      print!("{}", render::dashboard(&report));
      if !report.decision.is_granted() {
        return Ok(ExitCode::from(2));
      }
    }
    Command::Show { account } => {
      let record = client.account(&account).await?;
      print!("{}", render::account(&record));
    }
    Command::Activate { account, subscription_id, plan } => {
      let record = client.activate(&account, &subscription_id, plan).await?;
      print!("{}", render::account(&record));
    }
    Command::Cancel { account } => {
      let record = client.deactivate(&account).await?;
      print!("{}", render::account(&record));
    }
    Command::Redeem { account, code } => {
      let outcome = client.redeem(&account, &code).await?;
      print!("{}", render::redemption(&outcome));
      if matches!(outcome, RedemptionOutcome::Denied { .. }) {
        return Ok(ExitCode::from(2));
      }
    }
    Command::List { status } => {
      let records = client.list(status).await?;
      print!("{}", render::account_table(&records));
    }
  }
  Ok(ExitCode::SUCCESS)
}
