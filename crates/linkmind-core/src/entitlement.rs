//! The entitlement evaluator: maps an account record and the current time to
//! an access decision.
//!
//! Rules are checked in a fixed order and the first match wins:
//!
//! 1. override code redeemed
//! 2. payment provider reports an active subscription
//! 3. trial window still open (end-exclusive)
//! 4. deny
//!
//! A user who redeemed the override code keeps access even if a stale
//! `expired` status lingers on the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::account::{AccountRecord, SubscriptionStatus};

/// Why access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Grant {
  SecretCode,
  ActiveSubscription,
  TrialActive { trial_end: DateTime<Utc> },
}

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialReason {
  TrialExpired,
  NoActiveSubscription,
  /// The record could not be loaded, so evaluation never ran.
  AccountNotFound,
}

/// The outcome of an evaluation. "No access" is a value, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
  Granted(Grant),
  Denied { reason: DenialReason },
}

impl Decision {
  pub fn is_granted(&self) -> bool { matches!(self, Self::Granted(_)) }

  fn denied(reason: DenialReason) -> Self { Self::Denied { reason } }
}

/// Evaluate `account` at `now`.
pub fn evaluate(account: &AccountRecord, now: DateTime<Utc>) -> Decision {
  if account.has_secret_code {
    return Decision::Granted(Grant::SecretCode);
  }

  if account.paypal_subscription_active && account.subscription_id.is_some() {
    return Decision::Granted(Grant::ActiveSubscription);
  }

  // A trial record with no end date is not an open-ended trial; it falls
  // through to the default deny.
  if account.subscription_status == SubscriptionStatus::Trial
    && let Some(trial_end) = account.trial_end_date
  {
    return if now < trial_end {
      Decision::Granted(Grant::TrialActive { trial_end })
    } else {
      Decision::denied(DenialReason::TrialExpired)
    };
  }

  Decision::denied(DenialReason::NoActiveSubscription)
}

/// Evaluate the result of a store lookup; a missing record is denied with
/// [`DenialReason::AccountNotFound`].
pub fn evaluate_lookup(account: Option<&AccountRecord>, now: DateTime<Utc>) -> Decision {
  match account {
    Some(account) => evaluate(account, now),
    None => Decision::denied(DenialReason::AccountNotFound),
  }
}
