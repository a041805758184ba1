//! Identity records, owned by the identity provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One authentication account as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRecord {
  pub uid:               String,
  pub email:             Option<String>,
  pub disabled:          bool,
  pub creation_time:     DateTime<Utc>,
  /// `None` until the account signs in for the first time.
  pub last_sign_in_time: Option<DateTime<Utc>>,
}

/// A partial update for [`IdentityProvider::update_identity`].
///
/// [`IdentityProvider::update_identity`]: crate::provider::IdentityProvider::update_identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityPatch {
  pub disabled: Option<bool>,
}

impl IdentityPatch {
  pub fn disabled(disabled: bool) -> Self {
    Self {
      disabled: Some(disabled),
    }
  }
}
