//! Core types for LinkMind premium entitlements.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! evaluator is a pure function; mutations go through
//! [`service::EntitlementService`] over any [`store::AccountStore`].

pub mod account;
pub mod dashboard;
pub mod entitlement;
pub mod error;
pub mod service;
pub mod store;

pub use error::{Error, Result};
