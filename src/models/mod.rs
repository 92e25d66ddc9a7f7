// ABOUTME: Typed entities exchanged with the admin REST API
// Backend-owned records; the client never interprets revision markers

pub mod category;
pub mod deny_policy;
pub mod key_manager;
pub mod scopes;
pub mod throttling;

pub use category::ApiCategory;
pub use deny_policy::{ConditionType, DenyPolicy};
pub use key_manager::KeyManagerInfo;
pub use scopes::{permission_mappings, AppMappings, RoleAlias, RoleAliasList, Scope, ScopeList};
pub use throttling::{
    ApplicationThrottlingPolicy, BandwidthLimit, BurstLimit, LimitType, RequestCountLimit,
    ThrottleLimit,
};

use serde::{Deserialize, Serialize};

/// Backend collection envelope: `{ "count": n, "list": [...] }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection<T> {
    #[serde(default)]
    pub count: usize,
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new(list: Vec<T>) -> Self {
        Self { count: list.len(), list }
    }
}
