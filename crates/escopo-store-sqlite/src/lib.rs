//! SQLite backend for the Escopo user directory.
//!
//! A single database file plays both collaborator roles: it is the
//! [`IdentityProvider`](escopo_core::provider::IdentityProvider) holding
//! accounts and bearer credentials, and the
//! [`ProfileStore`](escopo_core::provider::ProfileStore) holding profile
//! documents. Access goes through [`tokio_rusqlite`] so queries never block
//! the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteDirectory;
