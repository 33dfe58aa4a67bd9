//! Async HTTP client wrapping the LinkMind JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use linkmind_core::{
  account::{AccountRecord, PlanType, SubscriptionStatus},
  dashboard::EntitlementReport,
  service::RedemptionOutcome,
};
use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;

/// Connection settings for the LinkMind API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Async HTTP client for the LinkMind JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  /// `<base>/api/<segments...>`, with each segment percent-encoded so an
  /// account argument cannot escape its path segment.
  fn url(&self, segments: &[&str]) -> Result<Url> {
    let mut url = Url::parse(&self.config.base_url)
      .with_context(|| format!("invalid server URL {:?}", self.config.base_url))?;
    url
      .path_segments_mut()
      .map_err(|()| anyhow!("server URL {:?} cannot carry a path", self.config.base_url))?
      .pop_if_empty()
      .push("api")
      .extend(segments);
    Ok(url)
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  /// `POST /api/accounts`
  pub async fn register(&self, display_name: &str) -> Result<AccountRecord> {
    let resp = self
      .auth(self.client.post(self.url(&["accounts"])?))
      .json(&json!({ "display_name": display_name }))
      .send()
      .await
      .context("POST /accounts failed")?;
    decode(resp, "POST /accounts").await
  }

  /// `GET /api/accounts[?status=...]`
  pub async fn list(&self, status: Option<SubscriptionStatus>) -> Result<Vec<AccountRecord>> {
    let mut req = self.auth(self.client.get(self.url(&["accounts"])?));
    if let Some(status) = status {
      req = req.query(&[("status", status.as_str())]);
    }
    let resp = req.send().await.context("GET /accounts failed")?;
    decode(resp, "GET /accounts").await
  }

  /// `GET /api/accounts/:id`
  pub async fn account(&self, account: &str) -> Result<AccountRecord> {
    let resp = self
      .auth(self.client.get(self.url(&["accounts", account])?))
      .send()
      .await
      .context("GET /accounts/:id failed")?;
    decode(resp, "GET /accounts/:id").await
  }

  /// `GET /api/accounts/:id/entitlement[?as_of=...]`
  pub async fn entitlement(
    &self,
    account: &str,
    as_of: Option<DateTime<Utc>>,
  ) -> Result<EntitlementReport> {
    let mut req = self.auth(self.client.get(self.url(&["accounts", account, "entitlement"])?));
    if let Some(as_of) = as_of {
      req = req.query(&[("as_of", as_of.to_rfc3339())]);
    }
    let resp = req.send().await.context("GET /entitlement failed")?;
    decode(resp, "GET /entitlement").await
  }

  // ── Mutators ──────────────────────────────────────────────────────────────

  /// `POST /api/accounts/:id/subscription`
  pub async fn activate(
    &self,
    account: &str,
    subscription_id: &str,
    plan_type: PlanType,
  ) -> Result<AccountRecord> {
    let resp = self
      .auth(self.client.post(self.url(&["accounts", account, "subscription"])?))
      .json(&json!({ "subscription_id": subscription_id, "plan_type": plan_type }))
      .send()
      .await
      .context("POST /subscription failed")?;
    decode(resp, "POST /subscription").await
  }

  /// `DELETE /api/accounts/:id/subscription`
  pub async fn deactivate(&self, account: &str) -> Result<AccountRecord> {
    let resp = self
      .auth(self.client.delete(self.url(&["accounts", account, "subscription"])?))
      .send()
      .await
      .context("DELETE /subscription failed")?;
    decode(resp, "DELETE /subscription").await
  }

  /// `POST /api/accounts/:id/redeem`
  ///
  /// Denials come back with 404/409/422 and an outcome body; those are
  /// returned as values rather than errors.
  pub async fn redeem(&self, account: &str, code: &str) -> Result<RedemptionOutcome> {
    let resp = self
      .auth(self.client.post(self.url(&["accounts", account, "redeem"])?))
      .json(&json!({ "code": code }))
      .send()
      .await
      .context("POST /redeem failed")?;

    match resp.status() {
      StatusCode::OK
      | StatusCode::NOT_FOUND
      | StatusCode::CONFLICT
      | StatusCode::UNPROCESSABLE_ENTITY => {
        resp.json().await.context("deserialising redemption outcome")
      }
      _ => Err(error_from(resp, "POST /redeem").await),
    }
  }
}

async fn decode<T: DeserializeOwned>(resp: Response, what: &str) -> Result<T> {
  if !resp.status().is_success() {
    return Err(error_from(resp, what).await);
  }
  resp
    .json()
    .await
    .with_context(|| format!("deserialising {what} response"))
}

/// Turn a non-success response into an error, preferring the server's
/// `{"error": ...}` message.
async fn error_from(resp: Response, what: &str) -> anyhow::Error {
  let status = resp.status();
  let message = resp
    .json::<serde_json::Value>()
    .await
    .ok()
    .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_owned));
  match message {
    Some(m) => anyhow!("{what} → {status}: {m}"),
    None => anyhow!("{what} → {status}"),
  }
}
