//! What a protected page should render for a given decision.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  account::AccountId,
  entitlement::{Decision, DenialReason, Grant},
};

/// A trial with this much time or less remaining shows the countdown banner.
pub const COUNTDOWN_THRESHOLD_DAYS: i64 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum DashboardView {
  FullAccess,
  TrialCountdown {
    trial_end: DateTime<Utc>,
    /// Whole days left, rounded up; `1` on the final day.
    days_left: i64,
  },
  Paywall { reason: DenialReason },
  PremiumBadge,
}

impl DashboardView {
  pub fn classify(decision: &Decision, now: DateTime<Utc>) -> Self {
    match *decision {
      Decision::Granted(Grant::SecretCode) => Self::PremiumBadge,
      Decision::Granted(Grant::ActiveSubscription) => Self::FullAccess,
      Decision::Granted(Grant::TrialActive { trial_end }) => {
        let remaining = trial_end - now;
        if remaining <= TimeDelta::days(COUNTDOWN_THRESHOLD_DAYS) {
          Self::TrialCountdown { trial_end, days_left: days_rounded_up(remaining) }
        } else {
          Self::FullAccess
        }
      }
      Decision::Denied { reason } => Self::Paywall { reason },
    }
  }
}

/// A decision bundled with its dashboard classification, as served to the
/// feature-gating UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementReport {
  pub account_id:   AccountId,
  pub evaluated_at: DateTime<Utc>,
  pub decision:     Decision,
  pub view:         DashboardView,
}

impl EntitlementReport {
  pub fn new(account_id: AccountId, decision: Decision, now: DateTime<Utc>) -> Self {
    Self {
      account_id,
      evaluated_at: now,
      view: DashboardView::classify(&decision, now),
      decision,
    }
  }
}

fn days_rounded_up(remaining: TimeDelta) -> i64 {
  const DAY: i64 = 24 * 60 * 60;
  let secs = remaining.num_seconds().max(0);
  (secs + DAY - 1) / DAY
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ts(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
  }

  fn trial(end: &str) -> Decision {
    Decision::Granted(Grant::TrialActive { trial_end: ts(end) })
  }

  #[test]
  fn early_trial_has_no_banner() {
    let view = DashboardView::classify(&trial("2025-01-08T00:00:00Z"), ts("2025-01-01T00:00:00Z"));
    assert_eq!(view, DashboardView::FullAccess);
  }

  #[test]
  fn banner_starts_at_three_days() {
    let end = "2025-01-08T00:00:00Z";
    assert_eq!(
      DashboardView::classify(&trial(end), ts("2025-01-04T23:59:59Z")),
      DashboardView::FullAccess
    );
    assert_eq!(
      DashboardView::classify(&trial(end), ts("2025-01-05T00:00:00Z")),
      DashboardView::TrialCountdown { trial_end: ts(end), days_left: 3 }
    );
  }

  #[test]
  fn last_hours_count_as_one_day() {
    let view = DashboardView::classify(&trial("2025-01-08T00:00:00Z"), ts("2025-01-07T20:00:00Z"));
    assert_eq!(
      view,
      DashboardView::TrialCountdown { trial_end: ts("2025-01-08T00:00:00Z"), days_left: 1 }
    );
  }

  #[test]
  fn grants_and_denials_map_to_views() {
    let now = ts("2025-01-01T00:00:00Z");
    assert_eq!(
      DashboardView::classify(&Decision::Granted(Grant::SecretCode), now),
      DashboardView::PremiumBadge
    );
    assert_eq!(
      DashboardView::classify(&Decision::Granted(Grant::ActiveSubscription), now),
      DashboardView::FullAccess
    );
    assert_eq!(
      DashboardView::classify(
        &Decision::Denied { reason: DenialReason::TrialExpired },
        now
      ),
      DashboardView::Paywall { reason: DenialReason::TrialExpired }
    );
  }
}
