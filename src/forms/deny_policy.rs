// ABOUTME: Deny (blacklist) policy form
// IP conditions validate address literals; fields of other condition types are stripped from the payload

use crate::api::{ApiError, ResourceClient};
use crate::controllers::form::{draft_bool, draft_text, Condition, Draft, EntityForm, FieldSpec, FormError};
use crate::controllers::validation::Rule;
use crate::i18n::Message;
use crate::models::{ConditionType, DenyPolicy};
use async_trait::async_trait;
use serde_json::{json, Value};

pub const CONDITION_VALUE_EMPTY: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.conditionValue.empty",
    "Condition value is empty.",
);
pub const FIXED_IP_BLANK: Message =
    Message::new("Throttling.Blacklist.Policy.policy.fixedIp.blank", "Ip address field is empty.");
pub const FIXED_IP_SPACES: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.fixedIp.white.spaces",
    "Ip address field contains white spaces.",
);
pub const FIXED_IP_INVALID: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.fixedIp.invalid",
    "Ip address entered is not valid.",
);
pub const STARTING_IP_BLANK: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.startingIp.blank",
    "Starting Ip address field is empty.",
);
pub const STARTING_IP_SPACES: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.startingIp.white.spaces",
    "Starting Ip address field contains white spaces.",
);
pub const STARTING_IP_INVALID: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.startingIp.invalid",
    "Starting Ip address entered is not valid.",
);
pub const ENDING_IP_BLANK: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.endingIp.blank",
    "Ending Ip address field is empty.",
);
pub const ENDING_IP_SPACES: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.endingIp.white.spaces",
    "Ending Ip address field contains white spaces.",
);
pub const ENDING_IP_INVALID: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.endingIp.invalid",
    "Ending Ip address entered is not valid.",
);
pub const ADD_SUCCESS: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.add.success",
    "Deny Policy added successfully.",
);
pub const STATUS_SUCCESS: Message = Message::new(
    "Throttling.Blacklist.Policy.policy.update.success",
    "Deny Policy status updated successfully.",
);

pub struct DenyPolicyForm {
    resource: ResourceClient,
}

impl DenyPolicyForm {
    pub fn new(resource: ResourceClient) -> Self {
        Self { resource }
    }
}

fn when_type(types: &[ConditionType]) -> Condition {
    Condition::any_of("conditionType", types.iter().map(|t| json!(t.as_str())).collect())
}

fn ip_field(name: &'static str, blank: Message, spaces: Message, invalid: Message, kind: ConditionType) -> FieldSpec {
    FieldSpec::new(name, "")
        .rule(Rule::non_empty(blank))
        .rule(Rule::no_whitespace(spaces))
        .rule(Rule::ip_address(invalid))
        .active_when(when_type(&[kind]))
}

#[async_trait]
impl EntityForm for DenyPolicyForm {
    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("conditionType", ConditionType::Api.as_str()),
            FieldSpec::new("conditionValue", "")
                .rule(Rule::non_empty(CONDITION_VALUE_EMPTY))
                .active_when(when_type(&[
                    ConditionType::Api,
                    ConditionType::Application,
                    ConditionType::User,
                ])),
            ip_field("fixedIp", FIXED_IP_BLANK, FIXED_IP_SPACES, FIXED_IP_INVALID, ConditionType::Ip),
            ip_field(
                "startingIp",
                STARTING_IP_BLANK,
                STARTING_IP_SPACES,
                STARTING_IP_INVALID,
                ConditionType::IpRange,
            ),
            ip_field(
                "endingIp",
                ENDING_IP_BLANK,
                ENDING_IP_SPACES,
                ENDING_IP_INVALID,
                ConditionType::IpRange,
            ),
            FieldSpec::new("invert", false)
                .active_when(when_type(&[ConditionType::Ip, ConditionType::IpRange])),
            FieldSpec::new("conditionStatus", true),
        ]
    }

    fn add_success(&self) -> Message {
        ADD_SUCCESS
    }

    fn edit_success(&self) -> Message {
        STATUS_SUCCESS
    }

    fn resource(&self) -> &ResourceClient {
        &self.resource
    }

    fn to_draft(&self, entity: &Value) -> Draft {
        let mut draft = Draft::new();
        if let Some(kind) = entity.get("conditionType").filter(|v| v.is_string()) {
            draft.insert("conditionType".to_string(), kind.clone());
        }
        if let Some(status) = entity.get("conditionStatus").and_then(Value::as_bool) {
            draft.insert("conditionStatus".to_string(), json!(status));
        }
        match entity.get("conditionValue") {
            Some(Value::Object(value)) => {
                for key in ["fixedIp", "startingIp", "endingIp", "invert"] {
                    if let Some(v) = value.get(key) {
                        draft.insert(key.to_string(), v.clone());
                    }
                }
            }
            Some(Value::String(value)) => {
                draft.insert("conditionValue".to_string(), json!(value));
            }
            _ => {}
        }
        draft
    }

    fn to_payload(&self, draft: &Draft) -> Result<Value, FormError> {
        let raw = draft_text(draft, "conditionType");
        let condition_type = ConditionType::parse(&raw).ok_or_else(|| FormError::InvalidField {
            field: "conditionType".to_string(),
            reason: format!("unknown condition type '{raw}'"),
        })?;
        let invert = draft_bool(draft, "invert");

        let condition_value = match condition_type {
            ConditionType::Ip => json!({
                "fixedIp": draft_text(draft, "fixedIp"),
                "invert": invert,
            }),
            ConditionType::IpRange => json!({
                "startingIp": draft_text(draft, "startingIp"),
                "endingIp": draft_text(draft, "endingIp"),
                "invert": invert,
            }),
            ConditionType::Api | ConditionType::Application | ConditionType::User => {
                json!(draft_text(draft, "conditionValue"))
            }
        };

        let policy = DenyPolicy {
            condition_id: None,
            condition_type,
            condition_value,
            condition_status: draft_bool(draft, "conditionStatus"),
        };
        serde_json::to_value(&policy).map_err(|e| FormError::Api(ApiError::Decode(e.to_string())))
    }

    /// Deny policies are immutable apart from their status
    async fn update(&self, id: &str, payload: Value) -> Result<Value, ApiError> {
        let body = json!({ "conditionStatus": payload["conditionStatus"] });
        let path = self.resource.family().item_path(id);
        self.resource.patch_status(id, body).await?.into_result(&path)
    }
}
