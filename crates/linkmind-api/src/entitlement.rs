//! Handler for `GET /accounts/:id/entitlement`.
//!
//! Called on every protected page load. A missing account is not an HTTP
//! error: it evaluates to `denied` with reason `account_not_found`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use linkmind_core::{
  dashboard::EntitlementReport, service::EntitlementService, store::AccountStore,
};
use serde::Deserialize;

use crate::{accounts::account_id, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct CheckParams {
  /// Evaluate at this instant instead of now.
  pub as_of: Option<DateTime<Utc>>,
}

/// `GET /accounts/:id/entitlement[?as_of=<rfc3339>]`
pub async fn check<S>(
  State(service): State<Arc<EntitlementService<S>>>,
  Path(raw_id): Path<String>,
  Query(params): Query<CheckParams>,
) -> Result<Json<EntitlementReport>, ApiError>
where
  S: AccountStore,
{
  let id = account_id(&raw_id)?;
  let now = params.as_of.unwrap_or_else(Utc::now);
  let decision = service.check_access(&id, now).await?;
  tracing::debug!(account_id = %id, ?decision, "entitlement evaluated");
  Ok(Json(EntitlementReport::new(id, decision, now)))
}
