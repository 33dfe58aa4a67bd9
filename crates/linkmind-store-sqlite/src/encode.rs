//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; enums as their lowercase
//! snake_case names.

use chrono::{DateTime, Utc};
use linkmind_core::account::{AccountId, AccountRecord, PlanType, SubscriptionStatus};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Row type ────────────────────────────────────────────────────────────────

/// Column values of an `accounts` row, in table order.
pub struct RawAccount {
  pub account_id:                 String,
  pub subscription_status:        String,
  pub has_secret_code:            bool,
  pub trial_start_date:           String,
  pub trial_end_date:             Option<String>,
  pub subscription_id:            Option<String>,
  pub plan_type:                  Option<String>,
  pub paypal_subscription_active: bool,
}

/// Column list matching [`RawAccount::from_row`].
pub const ACCOUNT_COLUMNS: &str = "account_id, subscription_status, has_secret_code, \
   trial_start_date, trial_end_date, subscription_id, plan_type, paypal_subscription_active";

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      account_id:                 row.get(0)?,
      subscription_status:        row.get(1)?,
      has_secret_code:            row.get(2)?,
      trial_start_date:           row.get(3)?,
      trial_end_date:             row.get(4)?,
      subscription_id:            row.get(5)?,
      plan_type:                  row.get(6)?,
      paypal_subscription_active: row.get(7)?,
    })
  }

  pub fn from_record(record: &AccountRecord) -> Self {
    Self {
      account_id:                 record.account_id.as_str().to_owned(),
      subscription_status:        record.subscription_status.as_str().to_owned(),
      has_secret_code:            record.has_secret_code,
      trial_start_date:           encode_dt(record.trial_start_date),
      trial_end_date:             record.trial_end_date.map(encode_dt),
      subscription_id:            record.subscription_id.clone(),
      plan_type:                  record.plan_type.map(|p| p.as_str().to_owned()),
      paypal_subscription_active: record.paypal_subscription_active,
    }
  }

  pub fn into_record(self) -> Result<AccountRecord> {
    Ok(AccountRecord {
      account_id:                 AccountId::from_normalized(self.account_id),
      subscription_status:        self.subscription_status.parse::<SubscriptionStatus>()?,
      has_secret_code:            self.has_secret_code,
      trial_start_date:           decode_dt(&self.trial_start_date)?,
      trial_end_date:             self.trial_end_date.as_deref().map(decode_dt).transpose()?,
      subscription_id:            self.subscription_id,
      plan_type:                  self
        .plan_type
        .as_deref()
        .map(str::parse::<PlanType>)
        .transpose()?,
      paypal_subscription_active: self.paypal_subscription_active,
    })
  }
}
