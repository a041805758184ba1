//! Error types for `escopo-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid custom claims: {0}")]
  InvalidClaims(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
