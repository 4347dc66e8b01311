//! Core logic: credential storage, hashing, paths, config, locking.

pub mod config;
pub mod credstore;
pub mod file_lock;
pub mod hashing;
pub mod paths;
