//! Plain-text rendering of API responses for the terminal.

use std::fmt::Write as _;

use linkmind_core::{
  account::AccountRecord,
  dashboard::{DashboardView, EntitlementReport},
  entitlement::{Decision, DenialReason, Grant},
  service::{RedemptionDenial, RedemptionOutcome},
};

const DATE_FMT: &str = "%Y-%m-%d %H:%M UTC";

/// One-line description of a denial, phrased for the account holder.
fn denial_text(reason: DenialReason) -> &'static str {
  match reason {
    DenialReason::TrialExpired => "Your free trial has ended.",
    DenialReason::NoActiveSubscription => "You have no active subscription.",
    DenialReason::AccountNotFound => "No account with that name exists.",
  }
}

/// The dashboard block a protected page would show.
pub fn dashboard(report: &EntitlementReport) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "account:  {}", report.account_id);
  let access = match report.decision {
    Decision::Granted(Grant::SecretCode) => "granted (secret code)",
    Decision::Granted(Grant::ActiveSubscription) => "granted (subscription)",
    Decision::Granted(Grant::TrialActive { .. }) => "granted (trial)",
    Decision::Denied { .. } => "denied",
  };
  let _ = writeln!(out, "access:   {access}");

  match report.view {
    DashboardView::FullAccess => {}
    DashboardView::PremiumBadge => {
      let _ = writeln!(out, "[ PREMIUM ]");
    }
    DashboardView::TrialCountdown { trial_end, days_left } => {
      let unit = if days_left == 1 { "day" } else { "days" };
      let _ = writeln!(
        out,
        "Trial ends in {days_left} {unit} ({}). Subscribe to keep access.",
        trial_end.format(DATE_FMT)
      );
    }
    DashboardView::Paywall { reason } => {
      let _ = writeln!(out, "{}", denial_text(reason));
      if reason != DenialReason::AccountNotFound {
        let _ = writeln!(out, "Subscribe monthly or yearly to unlock premium features.");
      }
    }
  }
  out
}

/// A single account as a labelled block.
pub fn account(record: &AccountRecord) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "account:       {}", record.account_id);
  let _ = writeln!(out, "status:        {}", record.subscription_status);
  if let Some(end) = record.trial_end_date {
    let _ = writeln!(out, "trial ends:    {}", end.format(DATE_FMT));
  }
  if let Some(id) = &record.subscription_id {
    let plan = record.plan_type.map(|p| p.as_str()).unwrap_or("-");
    let state = if record.paypal_subscription_active { "active" } else { "inactive" };
    let _ = writeln!(out, "subscription:  {id} ({plan}, {state})");
  }
  if record.has_secret_code {
    let _ = writeln!(out, "secret code:   redeemed");
  }
  out
}

/// One row per account.
pub fn account_table(records: &[AccountRecord]) -> String {
  if records.is_empty() {
    return "no accounts\n".to_string();
  }
  let width = records
    .iter()
    .map(|r| r.account_id.as_str().len())
    .max()
    .unwrap_or(0)
    .max("ACCOUNT".len());

  let mut out = String::new();
  let _ = writeln!(out, "{:<width$}  STATUS", "ACCOUNT");
  for r in records {
    let _ = writeln!(out, "{:<width$}  {}", r.account_id.as_str(), r.subscription_status);
  }
  out
}

pub fn redemption(outcome: &RedemptionOutcome) -> String {
  match outcome {
    RedemptionOutcome::Redeemed { account } => {
      format!("Code accepted. {} now has premium access.\n", account.account_id)
    }
    RedemptionOutcome::Denied { reason } => match reason {
      RedemptionDenial::AccountNotFound => "No account with that name exists.\n".to_string(),
      RedemptionDenial::InvalidCode => "That code is not valid.\n".to_string(),
      RedemptionDenial::AlreadyRedeemed => "A code was already redeemed on this account.\n".to_string(),
    },
  }
}

#[cfg(test)]
mod tests {
  use chrono::{DateTime, Utc};
  use linkmind_core::account::{AccountId, PlanType};

  use super::*;

  fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
  }

  fn report(decision: Decision, now: &str) -> EntitlementReport {
    EntitlementReport::new(AccountId::from_normalized("ana"), decision, ts(now))
  }

  #[test]
  fn countdown_banner_uses_singular_on_last_day() {
    let end = ts("2025-01-08T00:00:00Z");
    let text = dashboard(&report(
      Decision::Granted(Grant::TrialActive { trial_end: end }),
      "2025-01-07T12:00:00Z",
    ));
    assert!(text.contains("granted (trial)"));
    assert!(text.contains("Trial ends in 1 day (2025-01-08 00:00 UTC)"));
  }

  #[test]
  fn early_trial_has_no_banner() {
    let end = ts("2025-01-08T00:00:00Z");
    let text = dashboard(&report(
      Decision::Granted(Grant::TrialActive { trial_end: end }),
      "2025-01-01T00:00:00Z",
    ));
    assert!(!text.contains("Trial ends"));
  }

  #[test]
  fn paywall_offers_plans() {
    let text = dashboard(&report(
      Decision::Denied { reason: DenialReason::TrialExpired },
      "2025-01-09T00:00:00Z",
    ));
    assert!(text.contains("access:   denied"));
    assert!(text.contains("trial has ended"));
    assert!(text.contains("monthly or yearly"));
  }

  #[test]
  fn missing_account_gets_no_upsell() {
    let text = dashboard(&report(
      Decision::Denied { reason: DenialReason::AccountNotFound },
      "2025-01-09T00:00:00Z",
    ));
    assert!(!text.contains("Subscribe"));
  }

  #[test]
  fn secret_code_shows_badge() {
    let text = dashboard(&report(Decision::Granted(Grant::SecretCode), "2025-01-09T00:00:00Z"));
    assert!(text.contains("[ PREMIUM ]"));
  }

  #[test]
  fn account_block_lists_subscription() {
    let mut record =
      AccountRecord::new_trial(AccountId::from_normalized("ana"), ts("2025-01-01T00:00:00Z"));
    record.activate_subscription("I-ABC".to_string(), PlanType::Yearly);
    let text = account(&record);
    assert!(text.contains("status:        active"));
    assert!(text.contains("subscription:  I-ABC (yearly, active)"));
  }

  #[test]
  fn table_pads_to_longest_id() {
    let now = ts("2025-01-01T00:00:00Z");
    let rows = vec![
      AccountRecord::new_trial(AccountId::from_normalized("ana"), now),
      AccountRecord::new_trial(AccountId::from_normalized("bartholomew"), now),
    ];
    let text = account_table(&rows);
    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines[0], "ACCOUNT      STATUS");
    assert_eq!(lines[1], "ana          trial");
    assert_eq!(lines[2], "bartholomew  trial");
    assert_eq!(account_table(&[]), "no accounts\n");
  }
}
