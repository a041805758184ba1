//! The `IdentityProvider` and `ProfileStore` traits.
//!
//! Both are implemented by directory backends (e.g. `escopo-store-sqlite`).
//! The callable functions depend on these abstractions, not on any concrete
//! backend.

use std::future::Future;

use crate::{
  caller::CallerIdentity,
  identity::{IdentityPatch, IdentityRecord},
  profile::ProfileDocument,
};

/// System of record for authentication accounts.
///
/// All methods return `Send` futures so implementations can be shared across
/// tokio worker threads behind an `Arc`.
pub trait IdentityProvider: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Resolve a bearer credential to the caller it was issued for.
  ///
  /// Returns `None` for credentials the provider does not recognise, and for
  /// credentials belonging to disabled accounts.
  fn verify_token<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Option<CallerIdentity>, Self::Error>> + Send + 'a;

  /// Return at most `limit` accounts. There is no continuation token.
  fn list_identities(
    &self,
    limit: usize,
  ) -> impl Future<Output = Result<Vec<IdentityRecord>, Self::Error>> + Send + '_;

  /// Apply `patch` to the account `uid` and return the updated record.
  ///
  /// Fails if the account does not exist.
  fn update_identity<'a>(
    &'a self,
    uid: &'a str,
    patch: IdentityPatch,
  ) -> impl Future<Output = Result<IdentityRecord, Self::Error>> + Send + 'a;
}

/// Document database holding per-user profile fields.
pub trait ProfileStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read every document of `collection`. Unknown collections are empty.
  fn list_documents<'a>(
    &'a self,
    collection: &'a str,
  ) -> impl Future<Output = Result<Vec<ProfileDocument>, Self::Error>> + Send + 'a;
}
