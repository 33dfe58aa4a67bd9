//! HTTP server wiring for LinkMind entitlements.
//!
//! Mounts the JSON API under `/api` behind HTTP Basic auth and exposes an
//! unauthenticated `/health` probe.

pub mod auth;
pub mod error;

pub use error::Error;

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use axum::{Json, Router, middleware, routing::get};
use config::ConfigError;
use linkmind_core::{
  service::{EntitlementService, SecretCode},
  store::AccountStore,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use auth::{AuthConfig, require_auth};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered with
/// `LINKMIND_*` environment variables.
///
/// Deliberately not `Debug`: it carries the override code.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub auth_username:      String,
  pub auth_password_hash: String,
  /// The single override code accepted by the redeem endpoint.
  pub secret_code:        String,
}

impl ServerConfig {
  /// Defaults, then the TOML file at `path` if it exists, then the
  /// environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_sources(
      config::File::from(path).required(false),
      config::Environment::with_prefix("LINKMIND"),
    )
  }

  fn from_sources<F, E>(file: F, env: E) -> Result<Self, ConfigError>
  where
    F: config::Source + Send + Sync + 'static,
    E: config::Source + Send + Sync + 'static,
  {
    config::Config::builder()
      .set_default("host", "127.0.0.1")?
      .set_default("port", 8080)?
      .set_default("store_path", "linkmind.db")?
      .add_source(file)
      .add_source(env)
      .build()?
      .try_deserialize()
  }

  /// The override code, or `None` if the configured value is empty.
  pub fn secret_code(&self) -> Option<SecretCode> { SecretCode::new(self.secret_code.clone()) }

  /// `store_path` with a leading `~/` expanded to `$HOME`.
  pub fn resolved_store_path(&self) -> PathBuf {
    let raw = self.store_path.to_string_lossy();
    if let Some(rest) = raw.strip_prefix("~/")
      && let Ok(home) = std::env::var("HOME")
    {
      return PathBuf::from(home).join(rest);
    }
    self.store_path.clone()
  }

  pub fn auth(&self) -> AuthConfig {
    AuthConfig {
      username:      self.auth_username.clone(),
      password_hash: self.auth_password_hash.clone(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Everything the router needs, shared across requests.
#[derive(Clone)]
pub struct AppState<S> {
  pub service: Arc<EntitlementService<S>>,
  pub auth:    Arc<AuthConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AccountStore + 'static,
{
  let api = linkmind_api::api_router(state.service)
    .layer(middleware::from_fn_with_state(state.auth, require_auth));

  Router::new()
    .route("/health", get(health))
    .nest("/api", api)
    .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<Value> { Json(json!({ "status": "ok" })) }
