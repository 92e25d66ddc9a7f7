// ABOUTME: Deny (blacklist) policy model; condition value shape depends on condition type

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConditionType {
    #[default]
    Api,
    Application,
    Ip,
    #[serde(rename = "IPRANGE")]
    IpRange,
    User,
}

impl ConditionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionType::Api => "API",
            ConditionType::Application => "APPLICATION",
            ConditionType::Ip => "IP",
            ConditionType::IpRange => "IPRANGE",
            ConditionType::User => "USER",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "API" => Some(ConditionType::Api),
            "APPLICATION" => Some(ConditionType::Application),
            "IP" => Some(ConditionType::Ip),
            "IPRANGE" => Some(ConditionType::IpRange),
            "USER" => Some(ConditionType::User),
            _ => None,
        }
    }

    /// IP conditions carry an object value, the rest a plain string
    pub fn is_ip_based(&self) -> bool {
        matches!(self, ConditionType::Ip | ConditionType::IpRange)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DenyPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition_id: Option<String>,
    pub condition_type: ConditionType,
    /// String for API/APPLICATION/USER; `{fixedIp, invert}` or `{startingIp, endingIp, invert}` for IP types
    pub condition_value: Value,
    #[serde(default = "default_status")]
    pub condition_status: bool,
}

fn default_status() -> bool {
    true
}
