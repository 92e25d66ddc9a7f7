// ABOUTME: Application throttling (rate limiting) policy model

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LimitType {
    #[default]
    #[serde(rename = "REQUESTCOUNTLIMIT")]
    RequestCount,
    #[serde(rename = "BANDWIDTHLIMIT")]
    Bandwidth,
}

impl LimitType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitType::RequestCount => "REQUESTCOUNTLIMIT",
            LimitType::Bandwidth => "BANDWIDTHLIMIT",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "REQUESTCOUNTLIMIT" => Some(LimitType::RequestCount),
            "BANDWIDTHLIMIT" => Some(LimitType::Bandwidth),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestCountLimit {
    pub time_unit: String,
    pub unit_time: u64,
    pub request_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandwidthLimit {
    pub time_unit: String,
    pub unit_time: u64,
    pub data_amount: u64,
    pub data_unit: String,
}

/// Default quota; exactly one of the variant bodies is set, matching `limit_type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThrottleLimit {
    #[serde(rename = "type")]
    pub limit_type: LimitType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_count: Option<RequestCountLimit>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bandwidth: Option<BandwidthLimit>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BurstLimit {
    pub rate_limit_count: u64,
    pub rate_limit_time_unit: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationThrottlingPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_id: Option<String>,
    pub policy_name: String,
    #[serde(default)]
    pub description: String,
    pub default_limit: ThrottleLimit,
    /// Serialized as `null` when absent; the backend treats that as "no burst control"
    #[serde(default)]
    pub burst_limit: Option<BurstLimit>,
}
