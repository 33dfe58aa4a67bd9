//! Router tests against an in-memory SQLite store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use linkmind_core::service::{EntitlementService, SecretCode};
use linkmind_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::api_router;

async fn service() -> Arc<EntitlementService<SqliteStore>> {
  let store = SqliteStore::open_in_memory().await.unwrap();
  Arc::new(EntitlementService::new(store, SecretCode::new("prismas33").unwrap()))
}

async fn call(
  service: &Arc<EntitlementService<SqliteStore>>,
  method:  &str,
  uri:     &str,
  body:    Option<Value>,
) -> (StatusCode, Value) {
  let builder = Request::builder().method(method).uri(uri);
  let req = match body {
    Some(v) => builder
      .header(header::CONTENT_TYPE, "application/json")
      .body(Body::from(v.to_string()))
      .unwrap(),
    None => builder.body(Body::empty()).unwrap(),
  };
  let resp = api_router(service.clone()).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, value)
}

async fn register(service: &Arc<EntitlementService<SqliteStore>>, name: &str) -> Value {
  let (status, body) = call(service, "POST", "/accounts", Some(json!({ "display_name": name }))).await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body
}

// ── Accounts ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_normalizes_display_name() {
  let svc = service().await;
  let body = register(&svc, "Ana Sousa").await;
  assert_eq!(body["account_id"], "ana_sousa");
  assert_eq!(body["subscription_status"], "trial");
  assert_eq!(body["has_secret_code"], false);

  let (status, fetched) = call(&svc, "GET", "/accounts/ana_sousa", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched, body);
}

#[tokio::test]
async fn multi_word_ids_resolve_on_every_route() {
  let svc = service().await;
  register(&svc, "Rita Prisma").await;

  let (status, _) = call(&svc, "GET", "/accounts/rita_prisma", None).await;
  assert_eq!(status, StatusCode::OK);

  let (_, report) = call(&svc, "GET", "/accounts/rita_prisma/entitlement", None).await;
  assert_eq!(report["account_id"], "rita_prisma");
  assert_eq!(report["decision"]["reason"], "trial_active");

  let (status, _) = call(
    &svc,
    "POST",
    "/accounts/rita_prisma/subscription",
    Some(json!({ "subscription_id": "I-9", "plan_type": "monthly" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) =
    call(&svc, "POST", "/accounts/rita_prisma/redeem", Some(json!({ "code": "prismas33" }))).await;
  assert_eq!(status, StatusCode::OK, "{body}");
}

#[tokio::test]
async fn create_twice_conflicts() {
  let svc = service().await;
  register(&svc, "Ana Sousa").await;
  let (status, body) =
    call(&svc, "POST", "/accounts", Some(json!({ "display_name": "ana   sousa" }))).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert!(body["error"].as_str().unwrap().contains("ana_sousa"));
}

#[tokio::test]
async fn create_with_unusable_name_is_bad_request() {
  let svc = service().await;
  let (status, _) = call(&svc, "POST", "/accounts", Some(json!({ "display_name": "?!" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_account_is_404() {
  let svc = service().await;
  let (status, body) = call(&svc, "GET", "/accounts/nobody", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn list_filters_by_status() {
  let svc = service().await;
  register(&svc, "ana").await;
  register(&svc, "bo").await;
  call(
    &svc,
    "POST",
    "/accounts/bo/subscription",
    Some(json!({ "subscription_id": "I-77", "plan_type": "yearly" })),
  )
  .await;

  let (status, all) = call(&svc, "GET", "/accounts", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(all.as_array().unwrap().len(), 2);

  let (_, active) = call(&svc, "GET", "/accounts?status=active", None).await;
  let active = active.as_array().unwrap();
  assert_eq!(active.len(), 1);
  assert_eq!(active[0]["account_id"], "bo");
}

// ── Entitlement ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_trial_is_granted_without_banner() {
  let svc = service().await;
  register(&svc, "ana").await;

  let (status, body) = call(&svc, "GET", "/accounts/ana/entitlement", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["decision"]["decision"], "granted");
  assert_eq!(body["decision"]["reason"], "trial_active");
  assert_eq!(body["view"]["view"], "full_access");
}

#[tokio::test]
async fn as_of_shows_countdown_then_paywall() {
  let svc = service().await;
  let account = register(&svc, "ana").await;
  let trial_end: chrono::DateTime<chrono::Utc> =
    serde_json::from_value(account["trial_end_date"].clone()).unwrap();

  let near_end = (trial_end - chrono::TimeDelta::hours(30)).to_rfc3339();
  let uri = format!(
    "/accounts/ana/entitlement?as_of={}",
    near_end.replace('+', "%2B")
  );
  let (_, body) = call(&svc, "GET", &uri, None).await;
  assert_eq!(body["view"]["view"], "trial_countdown");
  assert_eq!(body["view"]["days_left"], 2);

  let uri = format!(
    "/accounts/ana/entitlement?as_of={}",
    trial_end.to_rfc3339().replace('+', "%2B")
  );
  let (_, body) = call(&svc, "GET", &uri, None).await;
  assert_eq!(body["decision"]["decision"], "denied");
  assert_eq!(body["decision"]["reason"], "trial_expired");
  assert_eq!(body["view"]["view"], "paywall");
}

#[tokio::test]
async fn unknown_account_is_denied_not_404() {
  let svc = service().await;
  let (status, body) = call(&svc, "GET", "/accounts/ghost/entitlement", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["decision"]["reason"], "account_not_found");
}

// ── Subscription ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn activate_and_deactivate_subscription() {
  let svc = service().await;
  register(&svc, "ana").await;

  let (status, body) = call(
    &svc,
    "POST",
    "/accounts/ana/subscription",
    Some(json!({ "subscription_id": "I-ABC", "plan_type": "monthly" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["subscription_status"], "active");
  assert_eq!(body["paypal_subscription_active"], true);

  let (_, report) = call(&svc, "GET", "/accounts/ana/entitlement", None).await;
  assert_eq!(report["decision"]["reason"], "active_subscription");

  let (status, body) = call(&svc, "DELETE", "/accounts/ana/subscription", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["subscription_status"], "expired");

  let (_, report) = call(&svc, "GET", "/accounts/ana/entitlement", None).await;
  assert_eq!(report["decision"]["reason"], "no_active_subscription");
}

#[tokio::test]
async fn deactivate_during_trial_changes_nothing() {
  let svc = service().await;
  let created = register(&svc, "ana").await;

  let (status, body) = call(&svc, "DELETE", "/accounts/ana/subscription", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, created);

  let (_, report) = call(&svc, "GET", "/accounts/ana/entitlement", None).await;
  assert_eq!(report["decision"]["reason"], "trial_active");
}

#[tokio::test]
async fn activate_unknown_account_is_404() {
  let svc = service().await;
  let (status, _) = call(
    &svc,
    "POST",
    "/accounts/ghost/subscription",
    Some(json!({ "subscription_id": "I-1", "plan_type": "yearly" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn activate_requires_subscription_id() {
  let svc = service().await;
  register(&svc, "ana").await;
  let (status, _) = call(
    &svc,
    "POST",
    "/accounts/ana/subscription",
    Some(json!({ "subscription_id": " ", "plan_type": "yearly" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ── Redemption ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn redeem_flow() {
  let svc = service().await;
  register(&svc, "ana").await;

  let (status, body) =
    call(&svc, "POST", "/accounts/ana/redeem", Some(json!({ "code": "nope" }))).await;
  assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  assert_eq!(body, json!({ "result": "denied", "reason": "invalid_code" }));

  let (status, body) =
    call(&svc, "POST", "/accounts/ana/redeem", Some(json!({ "code": "prismas33" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["result"], "redeemed");
  assert_eq!(body["account"]["subscription_status"], "premium_free");
  assert_eq!(body["account"]["trial_end_date"], Value::Null);

  let (status, body) =
    call(&svc, "POST", "/accounts/ana/redeem", Some(json!({ "code": "prismas33" }))).await;
  assert_eq!(status, StatusCode::CONFLICT);
  assert_eq!(body["reason"], "already_redeemed");

  let (_, report) = call(&svc, "GET", "/accounts/ana/entitlement", None).await;
  assert_eq!(report["decision"]["reason"], "secret_code");
  assert_eq!(report["view"]["view"], "premium_badge");
}

#[tokio::test]
async fn redeem_for_unknown_account_is_404() {
  let svc = service().await;
  let (status, body) =
    call(&svc, "POST", "/accounts/ghost/redeem", Some(json!({ "code": "prismas33" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["reason"], "account_not_found");
}
