//! JSON REST API for LinkMind entitlements.
//!
//! Exposes an axum [`Router`] backed by an [`EntitlementService`] over any
//! [`AccountStore`]. Auth, TLS, and transport concerns are the caller's
//! responsibility; payment-webhook signature checks happen before a request
//! reaches these routes.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", linkmind_api::api_router(service.clone()))
//! ```

pub mod accounts;
pub mod entitlement;
pub mod error;
pub mod redeem;
pub mod subscription;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use linkmind_core::{service::EntitlementService, store::AccountStore};

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<EntitlementService<S>>) -> Router<()>
where
  S: AccountStore + 'static,
{
  Router::new()
    // Accounts
    .route("/accounts", get(accounts::list::<S>).post(accounts::create::<S>))
    .route("/accounts/{id}", get(accounts::get_one::<S>))
    // Entitlement checks
    .route("/accounts/{id}/entitlement", get(entitlement::check::<S>))
    // Mutators
    .route(
      "/accounts/{id}/subscription",
      post(subscription::activate::<S>).delete(subscription::deactivate::<S>),
    )
    .route("/accounts/{id}/redeem", post(redeem::handler::<S>))
    .with_state(service)
}

#[cfg(test)]
mod tests;
