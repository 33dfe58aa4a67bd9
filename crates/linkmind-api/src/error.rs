//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use linkmind_core::Error as CoreError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<CoreError> for ApiError {
  fn from(e: CoreError) -> Self {
    match e {
      CoreError::AccountNotFound(id) => ApiError::NotFound(format!("account {id} not found")),
      CoreError::AccountAlreadyExists(id) => {
        tracing::error!(account_id = %id, "start_trial called for an existing account");
        ApiError::Conflict(format!("account {id} already exists"))
      }
      CoreError::InvalidAccountName(_) => ApiError::BadRequest(e.to_string()),
      CoreError::UnknownStatus(_) | CoreError::UnknownPlanType(_) => {
        ApiError::BadRequest(e.to_string())
      }
      CoreError::StoreReadFailed(_) | CoreError::StoreWriteFailed(_) => {
        tracing::warn!(error = %e, "account store failure");
        ApiError::Store(Box::new(e))
      }
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
