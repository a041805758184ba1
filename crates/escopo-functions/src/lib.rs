//! Admin callables for the Escopo user directory.
//!
//! Exposes an axum [`Router`] serving the `listUsers` and `setUserStatus`
//! callables, backed by any [`IdentityProvider`] and [`ProfileStore`].

pub mod auth;
pub mod callable;
pub mod error;
pub mod handlers;

pub use error::CallableError;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{get, post},
};
use escopo_core::provider::{IdentityProvider, ProfileStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{list_users, set_user_status};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `ESCOPO_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("escopo.db") }

// ─── Application state ────────────────────────────────────────────────────────

/// Process-wide handles to the two collaborators, built once at startup and
/// shared by every request.
pub struct AppState<I, P> {
  pub identity: Arc<I>,
  pub profiles: Arc<P>,
}

impl<I, P> Clone for AppState<I, P> {
  fn clone(&self) -> Self {
    Self {
      identity: Arc::clone(&self.identity),
      profiles: Arc::clone(&self.profiles),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the callable router.
pub fn router<I, P>(state: AppState<I, P>) -> Router
where
  I: IdentityProvider + 'static,
  P: ProfileStore + 'static,
{
  Router::new()
    .route("/listUsers",     post(list_users::handler::<I, P>))
    .route("/setUserStatus", post(set_user_status::handler::<I, P>))
    .route("/health",        get(|| async { "ok" }))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod fakes;

// ─── Integration tests ────────────────────────────────────────────────────────
