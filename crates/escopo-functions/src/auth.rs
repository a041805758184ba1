//! Bearer-credential extractor and the admin authorization check.

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use escopo_core::{
  caller::CallerIdentity,
  provider::{IdentityProvider, ProfileStore},
};

use crate::{AppState, error::CallableError};

const UNAUTHENTICATED: &str =
  "A função deve ser chamada por um usuário autenticado.";
const INVALID_CREDENTIAL: &str = "Credencial de autenticação inválida.";
const VERIFICATION_FAILED: &str =
  "Erro interno ao verificar a credencial do usuário.";

/// The verified caller of a callable, or `None` when the request carried no
/// credential at all.
///
/// A credential that is present but not recognised by the identity provider
/// rejects the request with `UNAUTHENTICATED` before the handler runs.
pub struct Caller(pub Option<CallerIdentity>);

/// Pull the token out of `Authorization: Bearer <token>`. The scheme name
/// is matched case-insensitively.
///
/// Returns `Ok(None)` when the header is absent.
pub fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, CallableError> {
  let Some(value) = headers.get(header::AUTHORIZATION) else {
    return Ok(None);
  };

  value
    .to_str()
    .ok()
    .and_then(|v| v.split_once(' '))
    .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
    .map(|(_, token)| token.trim())
    .filter(|t| !t.is_empty())
    .map(Some)
    .ok_or_else(|| CallableError::Unauthenticated(INVALID_CREDENTIAL.to_owned()))
}

/// Two-step admin check shared by every callable.
///
/// `denied` is the operation-specific `PERMISSION_DENIED` message.
pub fn require_admin(
  caller: Option<CallerIdentity>,
  denied: &str,
) -> Result<CallerIdentity, CallableError> {
  let caller =
    caller.ok_or_else(|| CallableError::Unauthenticated(UNAUTHENTICATED.to_owned()))?;
  if !caller.is_admin() {
    return Err(CallableError::PermissionDenied(denied.to_owned()));
  }
  Ok(caller)
}

/// `uid` of the caller for log records; `-` when anonymous.
pub fn caller_uid(caller: &Option<CallerIdentity>) -> &str {
  caller.as_ref().map_or("-", |c| c.uid.as_str())
}

impl<I, P> FromRequestParts<AppState<I, P>> for Caller
where
  I: IdentityProvider + 'static,
  P: ProfileStore + 'static,
{
  type Rejection = CallableError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<I, P>,
  ) -> Result<Self, Self::Rejection> {
    let Some(token) = bearer_token(&parts.headers)? else {
      return Ok(Caller(None));
    };

    match state.identity.verify_token(token).await {
      Ok(Some(caller)) => Ok(Caller(Some(caller))),
      Ok(None) => Err(CallableError::Unauthenticated(INVALID_CREDENTIAL.to_owned())),
      Err(e) => {
        tracing::error!(error = %e, "credential verification failed");
        Err(CallableError::Internal(VERIFICATION_FAILED.to_owned()))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use axum::http::HeaderValue;
  use escopo_core::caller::Claims;

  use super::*;

  fn headers(auth: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
    h
  }

  fn caller(admin: bool) -> CallerIdentity {
    CallerIdentity {
      uid:    "u1".into(),
      claims: Claims { admin },
    }
  }

  #[test]
  fn missing_header_is_anonymous() {
    assert_eq!(bearer_token(&HeaderMap::new()).unwrap(), None);
  }

  #[test]
  fn bearer_token_is_extracted() {
    assert_eq!(bearer_token(&headers("Bearer abc")).unwrap(), Some("abc"));
  }

  #[test]
  fn scheme_name_is_case_insensitive() {
    assert_eq!(bearer_token(&headers("bearer abc")).unwrap(), Some("abc"));
    assert_eq!(bearer_token(&headers("BEARER abc")).unwrap(), Some("abc"));
  }

  #[test]
  fn other_schemes_are_rejected() {
    let err = bearer_token(&headers("Basic dXNlcjpwdw==")).unwrap_err();
    assert_eq!(err.status(), "UNAUTHENTICATED");
    assert!(bearer_token(&headers("Bearer   ")).is_err());
  }

  #[test]
  fn anonymous_caller_is_unauthenticated() {
    let err = require_admin(None, "nope").unwrap_err();
    assert!(matches!(err, CallableError::Unauthenticated(_)));
  }

  #[test]
  fn non_admin_is_denied_with_operation_message() {
    let err = require_admin(Some(caller(false)), "nope").unwrap_err();
    assert_eq!(err, CallableError::PermissionDenied("nope".into()));
  }

  #[test]
  fn admin_passes() {
    assert_eq!(require_admin(Some(caller(true)), "nope").unwrap().uid, "u1");
  }
}
