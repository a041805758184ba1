//! The identity of whoever invoked a callable, as vouched for by the
//! identity provider.

use serde::{Deserialize, Serialize};

use crate::Result;

/// Custom claims attached to an account by the identity provider.
///
/// Stored as a free-form JSON object; only the keys below are interpreted.
/// Unknown keys are ignored and a missing `admin` key means "not an admin".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  #[serde(default)]
  pub admin: bool,
}

impl Claims {
  pub fn admin() -> Self { Self { admin: true } }

  /// Parse a claims bag, e.g. `{"admin": true, "plan": "pro"}`.
  pub fn from_json(raw: &str) -> Result<Self> { Ok(serde_json::from_str(raw)?) }

  pub fn to_json(&self) -> Result<String> { Ok(serde_json::to_string(self)?) }
}

/// A verified caller. Never persisted; rebuilt from the credential on every
/// call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerIdentity {
  pub uid:    String,
  pub claims: Claims,
}

impl CallerIdentity {
  pub fn is_admin(&self) -> bool { self.claims.admin }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_admin_claim_defaults_to_false() {
    let claims = Claims::from_json(r#"{"plan":"pro"}"#).unwrap();
    assert!(!claims.admin);
  }

  #[test]
  fn admin_claim_must_be_a_boolean() {
    assert!(Claims::from_json(r#"{"admin":"true"}"#).is_err());
    assert!(Claims::from_json(r#"{"admin":true}"#).unwrap().admin);
  }
}
