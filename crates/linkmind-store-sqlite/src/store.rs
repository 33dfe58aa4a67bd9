//! [`SqliteStore`], the SQLite implementation of [`AccountStore`].

use std::path::Path;

use linkmind_core::{
  account::{AccountId, AccountRecord},
  store::{AccountQuery, AccountStore},
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{ACCOUNT_COLUMNS, RawAccount},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An account store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AccountStore impl ───────────────────────────────────────────────────────

impl AccountStore for SqliteStore {
  type Error = crate::Error;

  async fn get_account(&self, id: AccountId) -> Result<Option<AccountRecord>> {
    let id_str = id.as_str().to_owned();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"),
              rusqlite::params![id_str],
              RawAccount::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAccount::into_record).transpose()
  }

  async fn insert_account(&self, record: AccountRecord) -> Result<bool> {
    let raw = RawAccount::from_record(&record);

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          &format!(
            "INSERT INTO accounts ({ACCOUNT_COLUMNS})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT (account_id) DO NOTHING"
          ),
          rusqlite::params![
            raw.account_id,
            raw.subscription_status,
            raw.has_secret_code,
            raw.trial_start_date,
            raw.trial_end_date,
            raw.subscription_id,
            raw.plan_type,
            raw.paypal_subscription_active,
          ],
        )?;
        Ok(changed == 1)
      })
      .await?;

    Ok(inserted)
  }

  async fn update_account(&self, record: AccountRecord) -> Result<bool> {
    let raw = RawAccount::from_record(&record);

    let updated = self
      .conn
      .call(move |conn| {
        // `has_secret_code` only ever moves from 0 to 1.
        let changed = conn.execute(
          "UPDATE accounts SET
             subscription_status        = ?2,
             has_secret_code            = MAX(has_secret_code, ?3),
             trial_start_date           = ?4,
             trial_end_date             = ?5,
             subscription_id            = ?6,
             plan_type                  = ?7,
             paypal_subscription_active = ?8
           WHERE account_id = ?1",
          rusqlite::params![
            raw.account_id,
            raw.subscription_status,
            raw.has_secret_code,
            raw.trial_start_date,
            raw.trial_end_date,
            raw.subscription_id,
            raw.plan_type,
            raw.paypal_subscription_active,
          ],
        )?;
        Ok(changed == 1)
      })
      .await?;

    Ok(updated)
  }

  async fn list_accounts(&self, query: AccountQuery) -> Result<Vec<AccountRecord>> {
    let status_str = query.status.map(|s| s.as_str().to_owned());
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val  = query.limit.map_or(-1, |l| l as i64);
    let offset_val = query.offset.unwrap_or(0) as i64;

    let raws: Vec<RawAccount> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACCOUNT_COLUMNS} FROM accounts
           WHERE (?1 IS NULL OR subscription_status = ?1)
           ORDER BY account_id
           LIMIT ?2 OFFSET ?3"
        ))?;
        let rows = stmt
          .query_map(
            rusqlite::params![status_str, limit_val, offset_val],
            RawAccount::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAccount::into_record).collect()
  }
}
