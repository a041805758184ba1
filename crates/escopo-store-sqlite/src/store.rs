//! [`SqliteDirectory`] — the SQLite implementation of [`IdentityProvider`]
//! and [`ProfileStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use escopo_core::{
  caller::{CallerIdentity, Claims},
  identity::{IdentityPatch, IdentityRecord},
  profile::{ProfileDocument, USERS_COLLECTION},
  provider::{IdentityProvider, ProfileStore},
};

use crate::{
  Error, Result,
  encode::{RawIdentity, RawProfile, encode_dt, generate_token, hash_token},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Escopo user directory backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteDirectory {
  conn: tokio_rusqlite::Connection,
}

impl SqliteDirectory {
  /// Open (or create) a directory at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory directory — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  /// Create an enabled account with a fresh uid.
  pub async fn create_identity(&self, email: Option<String>) -> Result<IdentityRecord> {
    let record = IdentityRecord {
      uid: Uuid::new_v4().simple().to_string(),
      email,
      disabled: false,
      creation_time: Utc::now(),
      last_sign_in_time: None,
    };
    self.insert_identity(&record).await?;
    tracing::info!(uid = %record.uid, "created identity");
    Ok(record)
  }

  /// Insert a fully-built record, e.g. when importing an existing directory.
  pub async fn insert_identity(&self, record: &IdentityRecord) -> Result<()> {
    let uid               = record.uid.clone();
    let email             = record.email.clone();
    let disabled          = record.disabled;
    let creation_time     = encode_dt(record.creation_time);
    let last_sign_in_time = record.last_sign_in_time.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO identities (uid, email, disabled, creation_time, last_sign_in_time)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![uid, email, disabled, creation_time, last_sign_in_time],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Replace the custom claims of `uid`.
  pub async fn set_claims(&self, uid: &str, claims: &Claims) -> Result<()> {
    let claims_json = claims.to_json()?;
    let uid_owned   = uid.to_owned();

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE identities SET custom_claims = ?2 WHERE uid = ?1",
          rusqlite::params![uid_owned, claims_json],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::IdentityNotFound(uid.to_owned()));
    }
    Ok(())
  }

  /// Sign `uid` in: issue a new bearer token and stamp the account's
  /// `last_sign_in_time`.
  ///
  /// The plaintext token is only ever returned here; the store keeps its
  /// digest.
  pub async fn issue_token(&self, uid: &str) -> Result<String> {
    let token     = generate_token();
    let hash      = hash_token(&token);
    let issued_at = encode_dt(Utc::now());
    let uid_owned = uid.to_owned();

    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let changed = tx.execute(
          "UPDATE identities SET last_sign_in_time = ?2 WHERE uid = ?1",
          rusqlite::params![uid_owned, issued_at],
        )?;
        if changed == 0 {
          return Ok(false);
        }
        tx.execute(
          "INSERT INTO credentials (token_hash, uid, issued_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![hash, uid_owned, issued_at],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    if !inserted {
      return Err(Error::IdentityNotFound(uid.to_owned()));
    }
    Ok(token)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  /// Insert or replace a document of the `users` collection.
  pub async fn put_profile(&self, doc: &ProfileDocument) -> Result<()> {
    let id            = doc.id.clone();
    let license_type  = doc.license_type.clone();
    let trial_ends_at = doc.trial_ends_at.map(encode_dt);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (id, license_type, trial_ends_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(id) DO UPDATE SET
             license_type  = excluded.license_type,
             trial_ends_at = excluded.trial_ends_at",
          rusqlite::params![id, license_type, trial_ends_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── IdentityProvider impl ───────────────────────────────────────────────────

impl IdentityProvider for SqliteDirectory {
  type Error = Error;

  async fn verify_token(&self, token: &str) -> Result<Option<CallerIdentity>> {
    let hash = hash_token(token);

    let row: Option<(String, bool, String)> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT i.uid, i.disabled, i.custom_claims
               FROM credentials c
               JOIN identities i ON i.uid = c.uid
              WHERE c.token_hash = ?1",
            rusqlite::params![hash],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
          )
          .optional()?)
      })
      .await?;

    match row {
      Some((uid, false, claims)) => Ok(Some(CallerIdentity {
        uid,
        claims: Claims::from_json(&claims)?,
      })),
      Some((uid, true, _)) => {
        tracing::debug!(%uid, "rejecting token of disabled identity");
        Ok(None)
      }
      None => Ok(None),
    }
  }

  async fn list_identities(&self, limit: usize) -> Result<Vec<IdentityRecord>> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let raws: Vec<RawIdentity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {} FROM identities ORDER BY rowid LIMIT ?1",
          RawIdentity::COLUMNS
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![limit], RawIdentity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawIdentity::into_record).collect()
  }

  async fn update_identity(
    &self,
    uid: &str,
    patch: IdentityPatch,
  ) -> Result<IdentityRecord> {
    let uid_owned = uid.to_owned();

    let raw: Option<RawIdentity> = self
      .conn
      .call(move |conn| {
        if let Some(disabled) = patch.disabled {
          conn.execute(
            "UPDATE identities SET disabled = ?2 WHERE uid = ?1",
            rusqlite::params![uid_owned, disabled],
          )?;
        }
        Ok(conn
          .query_row(
            &format!(
              "SELECT {} FROM identities WHERE uid = ?1",
              RawIdentity::COLUMNS
            ),
            rusqlite::params![uid_owned],
            RawIdentity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw
      .ok_or_else(|| Error::IdentityNotFound(uid.to_owned()))?
      .into_record()
  }
}

// ─── ProfileStore impl ───────────────────────────────────────────────────────

impl ProfileStore for SqliteDirectory {
  type Error = Error;

  async fn list_documents(&self, collection: &str) -> Result<Vec<ProfileDocument>> {
    if collection != USERS_COLLECTION {
      return Ok(Vec::new());
    }

    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, license_type, trial_ends_at FROM profiles")?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawProfile {
              id:            row.get(0)?,
              license_type:  row.get(1)?,
              trial_ends_at: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_document).collect()
  }
}
