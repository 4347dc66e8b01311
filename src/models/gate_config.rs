//! `apipasswd.toml` document model.

use crate::models::policy::PolicySection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateFile {
    #[serde(default)]
    pub policy: PolicySection,
}
