//! Policy applied by the command-line tool when setting a password.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicySection {
    /// Minimum length for a new password (CLI only; unset = any non-empty).
    #[serde(default)]
    pub min_password_length: Option<usize>,
}

impl PolicySection {
    /// Check a new password against the policy. Empty passwords are not
    /// checked here: they clear the credential instead of setting one.
    pub fn check_new_password(&self, password: &str) -> Result<(), String> {
        if password.is_empty() {
            return Ok(());
        }
        match self.min_password_length {
            Some(min) if password.chars().count() < min => Err(format!(
                "password must be at least {} characters",
                min
            )),
            _ => Ok(()),
        }
    }
}
