//! Profile documents — per-user business fields kept in the document store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Collection holding one profile document per account.
pub const USERS_COLLECTION: &str = "users";

/// License assumed for accounts without a (non-empty) `license_type`.
pub const DEFAULT_LICENSE_TYPE: &str = "trial";

/// A document from the [`USERS_COLLECTION`] collection, keyed by account uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDocument {
  pub id:            String,
  pub license_type:  Option<String>,
  pub trial_ends_at: Option<DateTime<Utc>>,
}

impl ProfileDocument {
  /// The stored license type, or [`DEFAULT_LICENSE_TYPE`] when it is absent
  /// or empty.
  pub fn license_type(&self) -> &str {
    match self.license_type.as_deref() {
      Some(l) if !l.is_empty() => l,
      _ => DEFAULT_LICENSE_TYPE,
    }
  }
}
