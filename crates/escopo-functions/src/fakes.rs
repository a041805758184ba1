//! Recording in-memory collaborators for router tests.

use std::{collections::HashMap, sync::Mutex};

use escopo_core::{
  caller::{CallerIdentity, Claims},
  identity::{IdentityPatch, IdentityRecord},
  profile::ProfileDocument,
  provider::{IdentityProvider, ProfileStore},
};

/// A collaborator call that fetches or mutates directory data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
  ListIdentities(usize),
  ListDocuments(String),
  UpdateIdentity(String, IdentityPatch),
}

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(String);

/// Plays both collaborator roles. Token verification is not recorded.
#[derive(Default)]
pub struct FakeDirectory {
  identities:          Vec<IdentityRecord>,
  profiles:            Vec<ProfileDocument>,
  tokens:              HashMap<String, CallerIdentity>,
  failure:             Option<String>,
  broken_verification: bool,
  calls:               Mutex<Vec<Call>>,
}

impl FakeDirectory {
  pub fn with_token(mut self, token: &str, uid: &str, admin: bool) -> Self {
    self.tokens.insert(token.to_owned(), CallerIdentity {
      uid:    uid.to_owned(),
      claims: Claims { admin },
    });
    self
  }

  pub fn with_identity(mut self, record: IdentityRecord) -> Self {
    self.identities.push(record);
    self
  }

  pub fn with_profile(mut self, doc: ProfileDocument) -> Self {
    self.profiles.push(doc);
    self
  }

  /// Make every data call fail with `message`.
  pub fn failing(mut self, message: &str) -> Self {
    self.failure = Some(message.to_owned());
    self
  }

  /// Make credential verification itself fail.
  pub fn failing_verification(mut self) -> Self {
    self.broken_verification = true;
    self
  }

  pub fn calls(&self) -> Vec<Call> { self.calls.lock().unwrap().clone() }

  fn record(&self, call: Call) -> Result<(), FakeError> {
    self.calls.lock().unwrap().push(call);
    match &self.failure {
      Some(message) => Err(FakeError(message.clone())),
      None => Ok(()),
    }
  }
}

impl IdentityProvider for FakeDirectory {
  type Error = FakeError;

  async fn verify_token(&self, token: &str) -> Result<Option<CallerIdentity>, FakeError> {
    if self.broken_verification {
      return Err(FakeError("token service unavailable".to_owned()));
    }
    Ok(self.tokens.get(token).cloned())
  }

  async fn list_identities(&self, limit: usize) -> Result<Vec<IdentityRecord>, FakeError> {
    self.record(Call::ListIdentities(limit))?;
    Ok(self.identities.iter().take(limit).cloned().collect())
  }

  async fn update_identity(
    &self,
    uid: &str,
    patch: IdentityPatch,
  ) -> Result<IdentityRecord, FakeError> {
    self.record(Call::UpdateIdentity(uid.to_owned(), patch))?;
    let mut record = self
      .identities
      .iter()
      .find(|r| r.uid == uid)
      .cloned()
      .ok_or_else(|| FakeError(format!("no user record for {uid}")))?;
    if let Some(disabled) = patch.disabled {
      record.disabled = disabled;
    }
    Ok(record)
  }
}

impl ProfileStore for FakeDirectory {
  type Error = FakeError;

  async fn list_documents(&self, collection: &str) -> Result<Vec<ProfileDocument>, FakeError> {
    self.record(Call::ListDocuments(collection.to_owned()))?;
    Ok(self.profiles.clone())
  }
}
