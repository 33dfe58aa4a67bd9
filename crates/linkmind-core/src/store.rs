//! The `AccountStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `linkmind-store-sqlite`).
//! Higher layers (`linkmind-api`, `linkmind-server`) depend on this
//! abstraction, not on any concrete backend.

use std::future::Future;

use crate::account::{AccountId, AccountRecord, SubscriptionStatus};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Parameters for [`AccountStore::list_accounts`].
#[derive(Debug, Clone, Default)]
pub struct AccountQuery {
  /// Restrict to accounts currently in this status.
  pub status: Option<SubscriptionStatus>,
  pub limit:  Option<usize>,
  pub offset: Option<usize>,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// A document store holding one [`AccountRecord`] per account id.
///
/// Every write replaces the whole record in a single operation; the backend
/// guarantees single-document atomicity and nothing more. There is no
/// application-level locking, so concurrent writers to the same account race
/// with last-write-wins semantics.
pub trait AccountStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Retrieve an account. Returns `None` if not found.
  fn get_account(
    &self,
    id: AccountId,
  ) -> impl Future<Output = Result<Option<AccountRecord>, Self::Error>> + Send + '_;

  /// Persist a new account. Returns `false` without writing if the id is
  /// already taken.
  fn insert_account(
    &self,
    record: AccountRecord,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Overwrite an existing account with `record`. Returns `false` if no
  /// account with that id exists.
  ///
  /// A backend may refuse to clear `has_secret_code` once set, so the stored
  /// row can differ from `record`; read it back for the persisted state.
  fn update_account(
    &self,
    record: AccountRecord,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// List accounts ordered by id.
  fn list_accounts(
    &self,
    query: AccountQuery,
  ) -> impl Future<Output = Result<Vec<AccountRecord>, Self::Error>> + Send + '_;
}
