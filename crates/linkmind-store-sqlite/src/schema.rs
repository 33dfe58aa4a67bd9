//! SQL schema for the LinkMind SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per account; every write replaces the whole row.
CREATE TABLE IF NOT EXISTS accounts (
    account_id                 TEXT PRIMARY KEY,
    subscription_status        TEXT NOT NULL,      -- 'trial' | 'active' | 'expired' | 'premium_free'
    has_secret_code            INTEGER NOT NULL DEFAULT 0,
    trial_start_date           TEXT NOT NULL,      -- RFC 3339 UTC
    trial_end_date             TEXT,               -- NULL once the override code is redeemed
    subscription_id            TEXT,
    plan_type                  TEXT,               -- 'monthly' | 'yearly'
    paypal_subscription_active INTEGER NOT NULL DEFAULT 0,
    CHECK (has_secret_code IN (0, 1)),
    CHECK (paypal_subscription_active IN (0, 1))
);

CREATE INDEX IF NOT EXISTS accounts_status_idx ON accounts(subscription_status);

PRAGMA user_version = 1;
";
