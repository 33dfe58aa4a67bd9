//! Entitlement mutators and lookups over an [`AccountStore`].
//!
//! Each mutation is a read-modify-write that writes back one complete record
//! in a single store call, so a failed write leaves nothing half-applied.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  Error, Result,
  account::{AccountId, AccountRecord, PlanType},
  entitlement::{Decision, evaluate_lookup},
  store::{AccountQuery, AccountStore},
};

// ─── Secret code ─────────────────────────────────────────────────────────────

/// The single override code accepted by [`EntitlementService::redeem_secret_code`].
///
/// Supplied from process configuration at startup. `Debug` never prints the
/// value.
#[derive(Clone)]
pub struct SecretCode(String);

impl SecretCode {
  /// Returns `None` for an empty code.
  pub fn new(code: impl Into<String>) -> Option<Self> {
    let code = code.into();
    (!code.is_empty()).then_some(Self(code))
  }

  /// Exact string comparison; no trimming or case folding.
  pub fn matches(&self, submitted: &str) -> bool { self.0 == submitted }
}

impl fmt::Debug for SecretCode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("SecretCode(..)") }
}

// ─── Redemption outcome ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RedemptionDenial {
  AccountNotFound,
  InvalidCode,
  AlreadyRedeemed,
}

/// Result of a redemption attempt. Rejections caused by user input are
/// values; only store failures are errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum RedemptionOutcome {
  Redeemed { account: AccountRecord },
  Denied { reason: RedemptionDenial },
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Entitlement operations bound to a store and the configured override code.
pub struct EntitlementService<S> {
  store:       S,
  secret_code: SecretCode,
}

impl<S: AccountStore> EntitlementService<S> {
  pub fn new(store: S, secret_code: SecretCode) -> Self { Self { store, secret_code } }

  pub fn store(&self) -> &S { &self.store }

  // ── Reads ─────────────────────────────────────────────────────────────────

  pub async fn get_account(&self, id: &AccountId) -> Result<Option<AccountRecord>> {
    self
      .store
      .get_account(id.clone())
      .await
      .map_err(|e| Error::StoreReadFailed(Box::new(e)))
  }

  pub async fn list_accounts(&self, query: AccountQuery) -> Result<Vec<AccountRecord>> {
    self
      .store
      .list_accounts(query)
      .await
      .map_err(|e| Error::StoreReadFailed(Box::new(e)))
  }

  /// Load the account and evaluate it at `now`.
  pub async fn check_access(&self, id: &AccountId, now: DateTime<Utc>) -> Result<Decision> {
    let account = self.get_account(id).await?;
    Ok(evaluate_lookup(account.as_ref(), now))
  }

  async fn require_account(&self, id: &AccountId) -> Result<AccountRecord> {
    self
      .get_account(id)
      .await?
      .ok_or_else(|| Error::AccountNotFound(id.clone()))
  }

  /// Write `record` and return the row as stored, which may differ from
  /// `record` where the backend refuses a change (e.g. clearing
  /// `has_secret_code`).
  async fn write_back(&self, record: AccountRecord) -> Result<AccountRecord> {
    let id = record.account_id.clone();
    let updated = self
      .store
      .update_account(record)
      .await
      .map_err(|e| Error::StoreWriteFailed(Box::new(e)))?;
    if !updated {
      return Err(Error::AccountNotFound(id));
    }
    self.require_account(&id).await
  }

  // ── Mutators ──────────────────────────────────────────────────────────────

  /// Register `id` with a fresh 7-day trial starting at `now`.
  pub async fn start_trial(&self, id: AccountId, now: DateTime<Utc>) -> Result<AccountRecord> {
    let record = AccountRecord::new_trial(id, now);
    let inserted = self
      .store
      .insert_account(record.clone())
      .await
      .map_err(|e| Error::StoreWriteFailed(Box::new(e)))?;
    if !inserted {
      return Err(Error::AccountAlreadyExists(record.account_id));
    }
    Ok(record)
  }

  /// Mark the account as holding a confirmed paid subscription.
  pub async fn activate_subscription(
    &self,
    id: &AccountId,
    subscription_id: String,
    plan_type: PlanType,
  ) -> Result<AccountRecord> {
    let mut record = self.require_account(id).await?;
    record.activate_subscription(subscription_id, plan_type);
    self.write_back(record).await
  }

  /// Mark the provider subscription as no longer active. An account that
  /// never held a subscription is returned unchanged and nothing is written.
  pub async fn deactivate_subscription(&self, id: &AccountId) -> Result<AccountRecord> {
    let mut record = self.require_account(id).await?;
    if !record.deactivate_subscription() {
      return Ok(record);
    }
    self.write_back(record).await
  }

  /// Try to apply the permanent override with a user-submitted code.
  ///
  /// Not coordinated across concurrent calls; two simultaneous redemptions
  /// both write the same terminal state.
  pub async fn redeem_secret_code(
    &self,
    id: &AccountId,
    submitted: &str,
  ) -> Result<RedemptionOutcome> {
    let Some(mut record) = self.get_account(id).await? else {
      return Ok(RedemptionOutcome::Denied { reason: RedemptionDenial::AccountNotFound });
    };

    if !self.secret_code.matches(submitted) {
      return Ok(RedemptionOutcome::Denied { reason: RedemptionDenial::InvalidCode });
    }

    if !record.redeem_secret_code() {
      return Ok(RedemptionOutcome::Denied { reason: RedemptionDenial::AlreadyRedeemed });
    }

    match self.write_back(record).await {
      Ok(account) => Ok(RedemptionOutcome::Redeemed { account }),
      Err(Error::AccountNotFound(_)) => {
        Ok(RedemptionOutcome::Denied { reason: RedemptionDenial::AccountNotFound })
      }
      Err(e) => Err(e),
    }
  }
}
