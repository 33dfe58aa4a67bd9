//! Error types for `linkmind-core`.

use thiserror::Error;

use crate::account::AccountId;

/// A boxed store error, erasing the backend's concrete error type.
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("account not found: {0}")]
  AccountNotFound(AccountId),

  /// `start_trial` was called for an id that is already registered. This is
  /// a caller bug (double registration), not a user error.
  #[error("account already exists: {0}")]
  AccountAlreadyExists(AccountId),

  #[error("display name {0:?} does not yield a usable account id")]
  InvalidAccountName(String),

  #[error("unknown subscription status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown plan type: {0:?}")]
  UnknownPlanType(String),

  #[error("store read failed: {0}")]
  StoreReadFailed(#[source] StoreError),

  #[error("store write failed: {0}")]
  StoreWriteFailed(#[source] StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
