//! Core types and trait definitions for the Escopo user directory.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The callable functions and the storage backends both depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod caller;
pub mod directory;
pub mod error;
pub mod identity;
pub mod profile;
pub mod provider;

pub use error::{Error, Result};
