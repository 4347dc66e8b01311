//! Data structures.

pub mod credential;
pub mod gate_config;
pub mod policy;
