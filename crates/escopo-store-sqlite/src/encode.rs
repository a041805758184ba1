//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings; booleans as `0`/`1` integers.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use escopo_core::{identity::IdentityRecord, profile::ProfileDocument};
use rand_core::{OsRng, RngCore as _};
use sha2::{Digest as _, Sha256};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

fn decode_opt_dt(s: Option<String>) -> Result<Option<DateTime<Utc>>> {
  s.as_deref().map(decode_dt).transpose()
}

// ─── Bearer tokens ───────────────────────────────────────────────────────────

/// 32 random bytes, base64url without padding.
pub fn generate_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  URL_SAFE_NO_PAD.encode(bytes)
}

/// Lowercase hex SHA-256 of the token, as stored in `credentials.token_hash`.
pub fn hash_token(token: &str) -> String {
  hex::encode(Sha256::digest(token.as_bytes()))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from an `identities` row.
pub struct RawIdentity {
  pub uid:               String,
  pub email:             Option<String>,
  pub disabled:          bool,
  pub creation_time:     String,
  pub last_sign_in_time: Option<String>,
}

impl RawIdentity {
  pub const COLUMNS: &'static str =
    "uid, email, disabled, creation_time, last_sign_in_time";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      uid:               row.get(0)?,
      email:             row.get(1)?,
      disabled:          row.get(2)?,
      creation_time:     row.get(3)?,
      last_sign_in_time: row.get(4)?,
    })
  }

  pub fn into_record(self) -> Result<IdentityRecord> {
    Ok(IdentityRecord {
      uid:               self.uid,
      email:             self.email,
      disabled:          self.disabled,
      creation_time:     decode_dt(&self.creation_time)?,
      last_sign_in_time: decode_opt_dt(self.last_sign_in_time)?,
    })
  }
}

/// Raw values read directly from a `profiles` row.
pub struct RawProfile {
  pub id:            String,
  pub license_type:  Option<String>,
  pub trial_ends_at: Option<String>,
}

impl RawProfile {
  pub fn into_document(self) -> Result<ProfileDocument> {
    Ok(ProfileDocument {
      id:            self.id,
      license_type:  self.license_type,
      trial_ends_at: decode_opt_dt(self.trial_ends_at)?,
    })
  }
}
