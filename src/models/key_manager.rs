// ABOUTME: Key manager summary as returned by the key manager collection

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyManagerInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(rename = "type")]
    pub manager_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub is_global: bool,
}

impl KeyManagerInfo {
    /// The built-in resident key manager and global ones (for tenant admins) cannot be deleted
    pub fn is_deletable(&self, is_super_admin: bool) -> bool {
        self.manager_type != "default" && (!self.is_global || is_super_admin)
    }
}
