//! Handlers for `/accounts` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/accounts` | Optional `?status=trial\|active\|expired\|premium_free`, `limit`, `offset` |
//! | `POST` | `/accounts` | Body: `{"display_name":"Ana Sousa"}`; starts the trial; 409 if taken |
//! | `GET`  | `/accounts/:id` | 404 if not found |
//!
//! Path ids are passed through the same normalization as display names, so
//! `/accounts/Ana%20Sousa` and `/accounts/ana_sousa` address the same record.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::Utc;
use linkmind_core::{
  account::{AccountId, AccountRecord, SubscriptionStatus},
  service::EntitlementService,
  store::{AccountQuery, AccountStore},
};
use serde::Deserialize;

use crate::error::ApiError;

/// Normalize a path segment into an [`AccountId`].
pub(crate) fn account_id(raw: &str) -> Result<AccountId, ApiError> {
  Ok(AccountId::from_display_name(raw)?)
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<SubscriptionStatus>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

/// `GET /accounts[?status=<status>][&limit=...][&offset=...]`
pub async fn list<S>(
  State(service): State<Arc<EntitlementService<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<AccountRecord>>, ApiError>
where
  S: AccountStore,
{
  let accounts = service
    .list_accounts(AccountQuery {
      status: params.status,
      limit:  params.limit,
      offset: params.offset,
    })
    .await?;
  Ok(Json(accounts))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub display_name: String,
}

/// `POST /accounts`: registers the account and starts its 7-day trial.
pub async fn create<S>(
  State(service): State<Arc<EntitlementService<S>>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AccountStore,
{
  let id = AccountId::from_display_name(&body.display_name)?;
  let record = service.start_trial(id, Utc::now()).await?;
  tracing::info!(
    account_id = %record.account_id,
    trial_end = ?record.trial_end_date,
    "trial started"
  );
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /accounts/:id`
pub async fn get_one<S>(
  State(service): State<Arc<EntitlementService<S>>>,
  Path(raw_id): Path<String>,
) -> Result<Json<AccountRecord>, ApiError>
where
  S: AccountStore,
{
  let id = account_id(&raw_id)?;
  let record = service
    .get_account(&id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("account {id} not found")))?;
  Ok(Json(record))
}
