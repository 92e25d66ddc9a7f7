// ABOUTME: API category form: name and description

use crate::api::{ApiError, ResourceClient};
use crate::controllers::form::{draft_text, Draft, EntityForm, FieldSpec, FormError};
use crate::controllers::validation::Rule;
use crate::i18n::Message;
use crate::models::ApiCategory;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

pub const NAME_EMPTY: Message =
    Message::new("AdminPages.ApiCategories.AddEdit.form.error.name.empty", "Name is Empty");
pub const NAME_TOO_LONG: Message = Message::new(
    "AdminPages.ApiCategories.AddEdit.form.error.name.too.long",
    "API Category name is too long",
);
pub const NAME_HAS_SPACES: Message = Message::new(
    "AdminPages.ApiCategories.AddEdit.form.error.name.has.spaces",
    "Name contains spaces",
);
pub const NAME_SPECIAL_CHARS: Message = Message::new(
    "AdminPages.ApiCategories.AddEdit.form.error.name.has.special.chars",
    "Name field contains special characters",
);
pub const DESCRIPTION_TOO_LONG: Message = Message::new(
    "AdminPages.ApiCategories.AddEdit.form.error.description.too.long",
    "API Category description is too long",
);
pub const ADD_SUCCESS: Message =
    Message::new("AdminPages.ApiCategories.AddEdit.form.add.successful", "API Category added successfully");
pub const EDIT_SUCCESS: Message = Message::new(
    "AdminPages.ApiCategories.AddEdit.form.edit.successful",
    "API Category edited successfully",
);

lazy_static! {
    static ref SPECIAL_CHARS: Regex = Regex::new(r#"[!@#$%^&*(),?"{}\[\]|<>\t\n]"#).unwrap();
}

pub struct ApiCategoryForm {
    resource: ResourceClient,
}

impl ApiCategoryForm {
    pub fn new(resource: ResourceClient) -> Self {
        Self { resource }
    }
}

#[async_trait]
impl EntityForm for ApiCategoryForm {
    fn fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("name", "")
                .rule(Rule::non_empty(NAME_EMPTY))
                .rule(Rule::max_length(255, NAME_TOO_LONG))
                .rule(Rule::no_whitespace(NAME_HAS_SPACES))
                .rule(Rule::disallowed(SPECIAL_CHARS.clone(), NAME_SPECIAL_CHARS)),
            FieldSpec::new("description", "").rule(Rule::max_length(1024, DESCRIPTION_TOO_LONG)),
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
        ["name", "description"]
            .into_iter()
            .filter_map(|key| entity.get(key).filter(|v| !v.is_null()).map(|v| (key.to_string(), v.clone())))
            .collect()
    }

    fn to_payload(&self, draft: &Draft) -> Result<Value, FormError> {
        let category = ApiCategory {
            id: None,
            name: draft_text(draft, "name"),
            description: draft_text(draft, "description"),
            number_of_apis: None,
        };
        serde_json::to_value(&category).map_err(|e| FormError::Api(ApiError::Decode(e.to_string())))
    }
}
