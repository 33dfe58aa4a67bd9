//! Handlers for `/accounts/:id/subscription`, called by the payment webhook
//! once the provider's signature has been verified.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/accounts/:id/subscription` | Body: `{"subscription_id":"I-...","plan_type":"monthly"}` |
//! | `DELETE` | `/accounts/:id/subscription` | Provider reports the subscription as no longer active; a no-op for accounts that never subscribed |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use linkmind_core::{
  account::{AccountRecord, PlanType},
  service::EntitlementService,
  store::AccountStore,
};
use serde::Deserialize;

use crate::{accounts::account_id, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct ActivateBody {
  pub subscription_id: String,
  pub plan_type:       PlanType,
}

/// `POST /accounts/:id/subscription`
pub async fn activate<S>(
  State(service): State<Arc<EntitlementService<S>>>,
  Path(raw_id): Path<String>,
  Json(body): Json<ActivateBody>,
) -> Result<Json<AccountRecord>, ApiError>
where
  S: AccountStore,
{
  if body.subscription_id.trim().is_empty() {
    return Err(ApiError::BadRequest("subscription_id must not be empty".into()));
  }
  let id = account_id(&raw_id)?;
  let record = service
    .activate_subscription(&id, body.subscription_id, body.plan_type)
    .await?;
  tracing::info!(
    account_id = %id,
    plan_type = ?body.plan_type,
    "subscription activated"
  );
  Ok(Json(record))
}

/// `DELETE /accounts/:id/subscription`
pub async fn deactivate<S>(
  State(service): State<Arc<EntitlementService<S>>>,
  Path(raw_id): Path<String>,
) -> Result<Json<AccountRecord>, ApiError>
where
  S: AccountStore,
{
  let id = account_id(&raw_id)?;
  let record = service.deactivate_subscription(&id).await?;
  if record.subscription_id.is_none() {
    tracing::debug!(account_id = %id, "no subscription to deactivate");
  } else {
    tracing::info!(
      account_id = %id,
      status = %record.subscription_status,
      "subscription deactivated"
    );
  }
  Ok(Json(record))
}
