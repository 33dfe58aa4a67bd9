//! Handler for `POST /accounts/:id/redeem`, called from the settings page.
//!
//! Rejections are user-input outcomes, returned as
//! `{"result":"denied","reason":"..."}` with a matching status code and
//! logged at debug level only.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use linkmind_core::{
  service::{EntitlementService, RedemptionDenial, RedemptionOutcome},
  store::AccountStore,
};
use serde::Deserialize;

use crate::{accounts::account_id, error::ApiError};

#[derive(Debug, Deserialize)]
pub struct RedeemBody {
  pub code: String,
}

/// `POST /accounts/:id/redeem` with body `{"code":"..."}`
pub async fn handler<S>(
  State(service): State<Arc<EntitlementService<S>>>,
  Path(raw_id): Path<String>,
  Json(body): Json<RedeemBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: AccountStore,
{
  let id = account_id(&raw_id)?;
  let outcome = service.redeem_secret_code(&id, &body.code).await?;

  let status = match &outcome {
    RedemptionOutcome::Redeemed { .. } => {
      tracing::info!(account_id = %id, "override code redeemed");
      StatusCode::OK
    }
    RedemptionOutcome::Denied { reason } => {
      tracing::debug!(account_id = %id, ?reason, "redemption rejected");
      match reason {
        RedemptionDenial::AccountNotFound => StatusCode::NOT_FOUND,
        RedemptionDenial::InvalidCode => StatusCode::UNPROCESSABLE_ENTITY,
        RedemptionDenial::AlreadyRedeemed => StatusCode::CONFLICT,
      }
    }
  };

  Ok((status, Json(outcome)))
}
