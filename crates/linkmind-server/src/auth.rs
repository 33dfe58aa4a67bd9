//! HTTP Basic auth in front of the back-office API.
//!
//! The API is called by the payment webhook relay and the operator CLI, both
//! holding a single shared username and password.

use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::{Request, State},
  http::{HeaderMap, header},
  middleware::Next,
  response::Response,
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;

use crate::error::Error;

/// The operator account allowed to call `/api`.
#[derive(Clone)]
pub struct AuthConfig {
  pub username:      String,
  /// Argon2 PHC string, as printed by `linkmind-server --hash-password`.
  pub password_hash: String,
}

impl AuthConfig {
  /// `false` for a wrong username, a wrong password, or an unparseable hash.
  pub fn verify(&self, username: &str, password: &str) -> bool {
    if username != self.username {
      return false;
    }
    let Ok(hash) = PasswordHash::new(&self.password_hash) else {
      tracing::warn!("auth_password_hash is not a valid PHC string");
      return false;
    };
    Argon2::default()
      .verify_password(password.as_bytes(), &hash)
      .is_ok()
  }
}

/// Split a `Basic` authorization header into `(username, password)`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
  let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
  let decoded = B64.decode(value.strip_prefix("Basic ")?).ok()?;
  let creds = String::from_utf8(decoded).ok()?;
  let (user, pass) = creds.split_once(':')?;
  Some((user.to_owned(), pass.to_owned()))
}

/// Check the request headers against `config`.
pub fn authenticate(headers: &HeaderMap, config: &AuthConfig) -> Result<(), Error> {
  match basic_credentials(headers) {
    Some((user, pass)) if config.verify(&user, &pass) => Ok(()),
    _ => Err(Error::Unauthorized),
  }
}

/// Middleware answering 401 unless the request authenticates.
pub async fn require_auth(
  State(config): State<Arc<AuthConfig>>,
  req: Request,
  next: Next,
) -> Result<Response, Error> {
  if let Err(e) = authenticate(req.headers(), &config) {
    tracing::debug!(path = %req.uri().path(), "rejected unauthenticated request");
    return Err(e);
  }
  Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::HeaderValue;
  use rand_core::OsRng;

  use super::*;

  fn operator(password: &str) -> AuthConfig {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();
    AuthConfig { username: "admin".to_string(), password_hash }
  }

  fn with_authorization(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  #[test]
  fn accepts_operator_credentials() {
    let cfg = operator("s3cret");
    assert!(authenticate(&with_authorization(&basic("admin", "s3cret")), &cfg).is_ok());
  }

  #[test]
  fn password_may_contain_colons() {
    let cfg = operator("a:b:c");
    assert!(authenticate(&with_authorization(&basic("admin", "a:b:c")), &cfg).is_ok());
  }

  #[test]
  fn rejects_wrong_user_or_password() {
    let cfg = operator("s3cret");
    for header in [basic("admin", "guess"), basic("root", "s3cret")] {
      assert!(matches!(
        authenticate(&with_authorization(&header), &cfg),
        Err(Error::Unauthorized)
      ));
    }
  }

  #[test]
  fn rejects_malformed_headers() {
    let cfg = operator("s3cret");
    assert!(authenticate(&HeaderMap::new(), &cfg).is_err());
    assert!(authenticate(&with_authorization("Bearer abc"), &cfg).is_err());
    assert!(authenticate(&with_authorization("Basic !!!"), &cfg).is_err());
    let no_colon = format!("Basic {}", B64.encode("admin"));
    assert!(authenticate(&with_authorization(&no_colon), &cfg).is_err());
  }

  #[test]
  fn broken_hash_never_verifies() {
    let cfg = AuthConfig { username: "admin".into(), password_hash: "plaintext".into() };
    assert!(!cfg.verify("admin", "plaintext"));
  }
}
