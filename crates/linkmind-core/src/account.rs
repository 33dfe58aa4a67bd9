//! The account record: one persisted document per registered user holding
//! subscription, trial and override-code state.
//!
//! Records are only changed through the transition methods below, which keep
//! the field invariants (fixed trial window, terminal override flag) intact.

use std::{fmt, str::FromStr};

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Length of the free trial, in days. Not configurable.
pub const TRIAL_DAYS: i64 = 7;

/// The fixed trial window as a duration.
pub fn trial_length() -> TimeDelta { TimeDelta::days(TRIAL_DAYS) }

// ─── AccountId ───────────────────────────────────────────────────────────────

/// Store key for an account, derived from the user's display name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
  /// Normalize a display name into an account id.
  ///
  /// Lowercases, turns each run of whitespace into a single `_`, then drops
  /// every character that is not an ASCII letter, digit or underscore.
  /// `"  Ana  Sousa! "` becomes `"ana_sousa"`. An id that is already
  /// normalized maps to itself.
  pub fn from_display_name(name: &str) -> Result<Self> {
    let mut id = String::with_capacity(name.len());
    let mut in_space = false;

    for c in name.trim().chars() {
      if c.is_whitespace() {
        if !in_space {
          id.push('_');
        }
        in_space = true;
        continue;
      }
      in_space = false;
      for lower in c.to_lowercase() {
        if lower.is_ascii_alphanumeric() || lower == '_' {
          id.push(lower);
        }
      }
    }

    if id.is_empty() || id.chars().all(|c| c == '_') {
      return Err(Error::InvalidAccountName(name.to_owned()));
    }
    Ok(Self(id))
  }

  /// Wrap an id that is already in normalized form (e.g. read back from the
  /// store or taken from a URL path).
  pub fn from_normalized(id: impl Into<String>) -> Self { Self(id.into()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for AccountId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ─── Enums ───────────────────────────────────────────────────────────────────

/// Coarse subscription state stored on the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
  Trial,
  Active,
  Expired,
  PremiumFree,
}

impl SubscriptionStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Trial => "trial",
      Self::Active => "active",
      Self::Expired => "expired",
      Self::PremiumFree => "premium_free",
    }
  }
}

impl FromStr for SubscriptionStatus {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "trial" => Ok(Self::Trial),
      "active" => Ok(Self::Active),
      "expired" => Ok(Self::Expired),
      "premium_free" => Ok(Self::PremiumFree),
      other => Err(Error::UnknownStatus(other.to_owned())),
    }
  }
}

impl fmt::Display for SubscriptionStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Billing cadence of a paid subscription. Informational only; the evaluator
/// never looks at it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
  Monthly,
  Yearly,
}

impl PlanType {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Monthly => "monthly",
      Self::Yearly => "yearly",
    }
  }
}

impl FromStr for PlanType {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self> {
    match s {
      "monthly" => Ok(Self::Monthly),
      "yearly" => Ok(Self::Yearly),
      other => Err(Error::UnknownPlanType(other.to_owned())),
    }
  }
}

// ─── AccountRecord ───────────────────────────────────────────────────────────

/// The persisted entitlement state of one user.
///
/// The trial, subscription and override fields can all be populated at once;
/// [`crate::entitlement::evaluate`] decides which one wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
  pub account_id:                 AccountId,
  pub subscription_status:        SubscriptionStatus,
  /// Terminal: once `true`, never reset.
  pub has_secret_code:            bool,
  pub trial_start_date:           DateTime<Utc>,
  /// Always `trial_start_date + 7 days`, or `None` after redemption.
  pub trial_end_date:             Option<DateTime<Utc>>,
  pub subscription_id:            Option<String>,
  pub plan_type:                  Option<PlanType>,
  pub paypal_subscription_active: bool,
}

impl AccountRecord {
  /// A freshly registered account whose 7-day trial starts at `now`.
  pub fn new_trial(account_id: AccountId, now: DateTime<Utc>) -> Self {
    Self {
      account_id,
      subscription_status: SubscriptionStatus::Trial,
      has_secret_code: false,
      trial_start_date: now,
      trial_end_date: Some(now + trial_length()),
      subscription_id: None,
      plan_type: None,
      paypal_subscription_active: false,
    }
  }

  /// Record a confirmed paid subscription. Trial dates are left in place as
  /// history.
  pub fn activate_subscription(&mut self, subscription_id: String, plan_type: PlanType) {
    self.subscription_status = SubscriptionStatus::Active;
    self.subscription_id = Some(subscription_id);
    self.plan_type = Some(plan_type);
    self.paypal_subscription_active = true;
  }

  /// Record that the payment provider no longer reports the subscription as
  /// active. An account holding the override code keeps `premium_free`.
  ///
  /// Returns `false` (and changes nothing) if the account never held a
  /// subscription, so a stray cancellation cannot end a running trial.
  pub fn deactivate_subscription(&mut self) -> bool {
    if self.subscription_id.is_none() && self.subscription_status != SubscriptionStatus::Active {
      return false;
    }
    self.paypal_subscription_active = false;
    if !self.has_secret_code {
      self.subscription_status = SubscriptionStatus::Expired;
    }
    true
  }

  /// Apply the permanent override. Returns `false` (and changes nothing) if
  /// the code was already redeemed.
  pub fn redeem_secret_code(&mut self) -> bool {
    if self.has_secret_code {
      return false;
    }
    self.subscription_status = SubscriptionStatus::PremiumFree;
    self.has_secret_code = true;
    self.trial_end_date = None;
    true
  }
}
