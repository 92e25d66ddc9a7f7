// ABOUTME: Application rate-limiting policy form
// Flat draft fields map onto nested defaultLimit/burstLimit objects and back

use crate::api::{ApiError, ResourceClient};
use crate::controllers::form::{draft_text, draft_u64, Condition, Draft, EntityForm, FieldSpec, FormError};
use crate::controllers::validation::Rule;
use crate::i18n::Message;
use crate::models::{
    ApplicationThrottlingPolicy, BandwidthLimit, BurstLimit, LimitType, RequestCountLimit,
    ThrottleLimit,
};
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{json, Value};

pub const NAME_EMPTY: Message =
    Message::new("Throttling.Application.Policy.policy.name.empty", "Name is Empty");
pub const NAME_SPACE: Message =
    Message::new("Throttling.Application.Policy.policy.name.space", "Name contains spaces");
pub const NAME_TOO_LONG: Message = Message::new(
    "Throttling.Application.Policy.policy.name.too.long",
    "Application policy name is too long",
);
pub const NAME_INVALID: Message = Message::new(
    "Throttling.Application.Policy.policy.name.invalid.character",
    "Name contains one or more illegal characters",
);
pub const REQUEST_COUNT_EMPTY: Message = Message::new(
    "Throttling.Application.Policy.policy.request.count.empty",
    "Request Count is Empty",
);
pub const REQUEST_COUNT_INVALID: Message = Message::new(
    "Throttling.Application.Policy.policy.request.count.invalid",
    "Invalid Request Count",
);
pub const DATA_AMOUNT_EMPTY: Message = Message::new(
    "Throttling.Application.Policy.policy.data.amount.empty",
    "Data Amount is Empty",
);
pub const DATA_AMOUNT_INVALID: Message = Message::new(
    "Throttling.Application.Policy.policy.data.amount.invalid",
    "Invalid Data Amount",
);
pub const UNIT_TIME_EMPTY: Message =
    Message::new("Throttling.Application.Policy.policy.unit.time.empty", "Unit Time is Empty");
pub const UNIT_TIME_INVALID: Message =
    Message::new("Throttling.Application.Policy.policy.unit.time.negative", "Invalid Time Value");
pub const BURST_COUNT_INVALID: Message = Message::new(
    "Throttling.Application.Policy.policy.burst.count.invalid",
    "Invalid Rate Limit Count",
);
pub const ADD_SUCCESS: Message = Message::new(
    "Throttling.Application.Policy.policy.add.success",
    "Application Rate Limiting Policy added successfully.",
);
pub const EDIT_SUCCESS: Message = Message::new(
    "Throttling.Application.Policy.policy.edit.success",
    "Application Rate Limiting Policy edited successfully.",
);

const MAX_NAME_LENGTH: usize = 60;

lazy_static! {
    static ref ILLEGAL_NAME_CHARS: Regex = Regex::new(r#"[~!@#;:%^*()+={}|\\<>"',&$]"#).unwrap();
    static ref NON_DIGIT: Regex = Regex::new(r"\D").unwrap();
}

pub struct ApplicationPolicyForm {
    resource: ResourceClient,
}

impl ApplicationPolicyForm {
    pub fn new(resource: ResourceClient) -> Self {
        Self { resource }
    }

    fn limit_type(draft: &Draft) -> Result<LimitType, FormError> {
        let raw = draft_text(draft, "type");
        LimitType::parse(&raw).ok_or_else(|| FormError::InvalidField {
            field: "type".to_string(),
            reason: format!("unknown limit type '{raw}'"),
        })
    }

    fn burst_limit(draft: &Draft) -> Result<Option<BurstLimit>, FormError> {
        if draft_text(draft, "rateLimitCount").is_empty() {
            return Ok(None);
        }
        let count = draft_u64(draft, "rateLimitCount")?;
        if count == 0 {
            return Ok(None);
        }
        Ok(Some(BurstLimit {
            rate_limit_count: count,
            rate_limit_time_unit: draft_text(draft, "rateLimitTimeUnit"),
        }))
    }
}

fn request_count_active() -> Condition {
    Condition::equals("type", LimitType::RequestCount.as_str())
}

fn bandwidth_active() -> Condition {
    Condition::equals("type", LimitType::Bandwidth.as_str())
}

#[async_trait]
impl EntityForm for ApplicationPolicyForm {
    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("policyName", "")
                .rule(Rule::non_empty(NAME_EMPTY))
                .rule(Rule::no_whitespace(NAME_SPACE))
                .rule(Rule::max_length(MAX_NAME_LENGTH, NAME_TOO_LONG))
                .rule(Rule::disallowed(ILLEGAL_NAME_CHARS.clone(), NAME_INVALID)),
            FieldSpec::new("description", ""),
            FieldSpec::new("type", LimitType::RequestCount.as_str()),
            FieldSpec::new("requestCount", "")
                .rule(Rule::non_empty(REQUEST_COUNT_EMPTY))
                .rule(Rule::positive_integer(REQUEST_COUNT_INVALID))
                .active_when(request_count_active()),
            FieldSpec::new("dataAmount", "")
                .rule(Rule::non_empty(DATA_AMOUNT_EMPTY))
                .rule(Rule::positive_integer(DATA_AMOUNT_INVALID))
                .active_when(bandwidth_active()),
            FieldSpec::new("dataUnit", "KB").active_when(bandwidth_active()),
            FieldSpec::new("timeUnit", "min"),
            FieldSpec::new("unitTime", "")
                .rule(Rule::non_empty(UNIT_TIME_EMPTY))
                .rule(Rule::positive_integer(UNIT_TIME_INVALID)),
            FieldSpec::new("rateLimitCount", "").rule(Rule::disallowed(NON_DIGIT.clone(), BURST_COUNT_INVALID)),
            FieldSpec::new("rateLimitTimeUnit", "sec"),
        ]
    }

    fn add_success(&self) -> Message {
        ADD_SUCCESS
    }

    fn edit_success(&self) -> Message {
        EDIT_SUCCESS
    }

    fn resource(&self) -> &ResourceClient {
        &self.resource
    }

    fn to_draft(&self, entity: &Value) -> Draft {
        let mut draft = Draft::new();
        let mut put = |name: &str, value: &Value| {
            if !value.is_null() {
                draft.insert(name.to_string(), value.clone());
            }
        };

        put("policyName", &entity["policyName"]);
        put("description", &entity["description"]);

        let limit = &entity["defaultLimit"];
        put("type", &limit["type"]);
        let body = if limit["requestCount"].is_object() {
            &limit["requestCount"]
        } else {
            &limit["bandwidth"]
        };
        put("requestCount", &body["requestCount"]);
        put("dataAmount", &body["dataAmount"]);
        put("dataUnit", &body["dataUnit"]);
        put("timeUnit", &body["timeUnit"]);
        put("unitTime", &body["unitTime"]);

        let burst = &entity["burstLimit"];
        let count = &burst["rateLimitCount"];
        // A zero burst count means burst control is off; reset its unit
        if count.as_u64() == Some(0) {
            put("rateLimitTimeUnit", &json!("sec"));
        } else {
            put("rateLimitCount", count);
            put("rateLimitTimeUnit", &burst["rateLimitTimeUnit"]);
        }
        draft
    }

    fn to_payload(&self, draft: &Draft) -> Result<Value, FormError> {
        let limit_type = Self::limit_type(draft)?;
        let time_unit = draft_text(draft, "timeUnit");
        let unit_time = draft_u64(draft, "unitTime")?;

        let default_limit = match limit_type {
            LimitType::RequestCount => ThrottleLimit {
                limit_type,
                request_count: Some(RequestCountLimit {
                    time_unit,
                    unit_time,
                    request_count: draft_u64(draft, "requestCount")?,
                }),
                bandwidth: None,
            },
            LimitType::Bandwidth => ThrottleLimit {
                limit_type,
                request_count: None,
                bandwidth: Some(BandwidthLimit {
                    time_unit,
                    unit_time,
                    data_amount: draft_u64(draft, "dataAmount")?,
                    data_unit: draft_text(draft, "dataUnit"),
                }),
            },
        };

        let policy = ApplicationThrottlingPolicy {
            policy_id: None,
            policy_name: draft_text(draft, "policyName"),
            description: draft_text(draft, "description"),
            default_limit,
            burst_limit: Self::burst_limit(draft)?,
        };
        serde_json::to_value(&policy).map_err(|e| FormError::Api(ApiError::Decode(e.to_string())))
    }
}
