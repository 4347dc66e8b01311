//! Password gate for a service's administrative interface.
//!
//! Stores a single salted SHA-256 password digest in `<root>/apipasswd`
//! and answers "is a password set" and "does this password match".
//!
//! ## Modules
//! - `core` — Credential store, hashing, paths, config, locking
//! - `service` — Request gate and change-password endpoint
//! - `cli` — Operator command-line handlers
//! - `models` — Data structures
//! - `util` — Filesystem helpers

pub mod cli;
pub mod constants;
pub mod core;
pub mod error;
pub mod models;
pub mod service;
pub mod util;

pub use crate::core::credstore::CredentialStore;
pub use error::{AuthError, Result};
