// ABOUTME: Generic form controller: owns one draft from open to save or cancel
// Entity-specific behaviour lives in an `EntityForm` definition (fields, mapping, save calls)

use crate::api::{ApiError, ResourceClient};
use crate::controllers::list::ReloadTrigger;
use crate::controllers::validation::{check, value_text, Rule, ValidationResult};
use crate::i18n::{Localizer, Message};
use crate::notify::Notifier;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Client-local copy of an entity's fields, keyed by field name
pub type Draft = BTreeMap<String, Value>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FormError {
    #[error("No draft is open")]
    NotOpen,

    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field {field} cannot be mapped: {reason}")]
    InvalidField { field: String, reason: String },

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Field is active only while another field holds one of the listed values
#[derive(Debug, Clone)]
pub struct Condition {
    pub field: &'static str,
    pub any_of: Vec<Value>,
}

impl Condition {
    pub fn equals(field: &'static str, value: impl Into<Value>) -> Self {
        Self { field, any_of: vec![value.into()] }
    }

    pub fn any_of(field: &'static str, values: Vec<Value>) -> Self {
        Self { field, any_of: values }
    }

    pub fn holds(&self, draft: &Draft) -> bool {
        draft
            .get(self.field)
            .map_or(false, |value| self.any_of.contains(value))
    }
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: &'static str,
    pub default: Value,
    pub rules: Vec<Rule>,
    pub active_when: Option<Condition>,
}

impl FieldSpec {
    pub fn new(name: &'static str, default: impl Into<Value>) -> Self {
        Self {
            name,
            default: default.into(),
            rules: Vec::new(),
            active_when: None,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn active_when(mut self, condition: Condition) -> Self {
        self.active_when = Some(condition);
        self
    }

    pub fn is_active(&self, draft: &Draft) -> bool {
        self.active_when.as_ref().map_or(true, |c| c.holds(draft))
    }
}

/// Definition of one entity's form: fields, mapping to and from the backend shape, save calls
#[async_trait]
pub trait EntityForm: Send + Sync {
    fn fields(&self) -> Vec<FieldSpec>;

    fn add_success(&self) -> Message;

    fn edit_success(&self) -> Message;

    /// Client the default fetch/create/update calls go through
    fn resource(&self) -> &ResourceClient;

    /// Flatten a backend entity into draft fields
    fn to_draft(&self, entity: &Value) -> Draft;

    /// Shape a valid draft into the backend request body
    fn to_payload(&self, draft: &Draft) -> Result<Value, FormError>;

    async fn fetch(&self, id: &str) -> Result<Value, ApiError> {
        self.resource().fetch(id).await
    }

    async fn create(&self, payload: Value) -> Result<Value, ApiError> {
        let path = self.resource().family().collection_path();
        self.resource().create(payload).await?.into_result(path)
    }

    async fn update(&self, id: &str, payload: Value) -> Result<Value, ApiError> {
        let path = self.resource().family().item_path(id);
        self.resource().update(id, payload).await?.into_result(&path)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenOutcome {
    Opened,
    /// The entity no longer exists; render the not-found view
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; carries the aggregated message, nothing was sent
    Invalid(String),
    Saved(String),
    Failed(String),
    /// No draft open, or a save is already in flight
    Ignored,
}

/// An in-flight save detached from its controller, so the controller can be
/// released (and a second submit ignored) while the request runs
pub struct PendingSave<F: EntityForm> {
    form: Arc<F>,
    id: Option<String>,
    payload: Value,
}

impl<F: EntityForm> PendingSave<F> {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Issue the single create or update call
    pub async fn send(self) -> Result<Value, ApiError> {
        match self.id.as_deref() {
            Some(id) => self.form.update(id, self.payload).await,
            None => self.form.create(self.payload).await,
        }
    }
}

pub struct FormController<F: EntityForm> {
    form: Arc<F>,
    fields: Vec<FieldSpec>,
    draft: Option<Draft>,
    editing_id: Option<String>,
    validation: ValidationResult,
    saving: bool,
    intl: Arc<dyn Localizer>,
    notifier: Arc<dyn Notifier>,
    reload: Option<ReloadTrigger>,
}

impl<F: EntityForm> FormController<F> {
    pub fn new(form: F, intl: Arc<dyn Localizer>, notifier: Arc<dyn Notifier>) -> Self {
        let fields = form.fields();
        Self {
            form: Arc::new(form),
            fields,
            draft: None,
            editing_id: None,
            validation: ValidationResult::new(),
            saving: false,
            intl,
            notifier,
            reload: None,
        }
    }

    /// List to reload after a successful save
    pub fn with_reload(mut self, trigger: ReloadTrigger) -> Self {
        self.reload = Some(trigger);
        self
    }

    pub fn form(&self) -> &F {
        &self.form
    }

    pub fn is_open(&self) -> bool {
        self.draft.is_some()
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn draft(&self) -> Option<&Draft> {
        self.draft.as_ref()
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.draft.as_ref().and_then(|d| d.get(name))
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    fn default_draft(&self) -> Draft {
        self.fields
            .iter()
            .map(|f| (f.name.to_string(), f.default.clone()))
            .collect()
    }

    /// Open a fresh draft, or fetch `id` and edit its current backend state
    pub async fn open(&mut self, id: Option<&str>) -> OpenOutcome {
        self.close();

        let Some(id) = id else {
            debug!("Opening empty draft");
            self.draft = Some(self.default_draft());
            return OpenOutcome::Opened;
        };

        match self.form.fetch(id).await {
            Ok(entity) => {
                let mut draft = self.default_draft();
                draft.extend(self.form.to_draft(&entity));
                debug!(id, "Opened draft for edit");
                self.draft = Some(draft);
                self.editing_id = Some(id.to_string());
                OpenOutcome::Opened
            }
            Err(e) if e.is_not_found() => {
                warn!(id, "Entity not found while opening for edit");
                OpenOutcome::NotFound
            }
            Err(e) => {
                warn!(id, "Failed to load entity for edit: {}", e);
                let message = e.user_message(self.intl.as_ref());
                self.notifier.error(message.clone());
                OpenOutcome::Failed(message)
            }
        }
    }

    fn validate_field(&mut self, index: usize) {
        let Some(draft) = self.draft.as_ref() else {
            return;
        };
        let spec = &self.fields[index];
        let error = if spec.is_active(draft) {
            let value = draft.get(spec.name).cloned().unwrap_or(Value::Null);
            check(&spec.rules, &value, self.intl.as_ref())
        } else {
            None
        };
        let name = spec.name;
        self.validation.set(name, error);
    }

    /// Update one field and re-validate it plus every field whose activation depends on it
    pub fn set_field(&mut self, name: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let index = self
            .fields
            .iter()
            .position(|f| f.name == name)
            .ok_or_else(|| FormError::UnknownField(name.to_string()))?;
        let draft = self.draft.as_mut().ok_or(FormError::NotOpen)?;
        draft.insert(name.to_string(), value.into());

        self.validate_field(index);
        let dependents: Vec<usize> = self
            .fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.active_when.as_ref().is_some_and(|c| c.field == name))
            .map(|(i, _)| i)
            .collect();
        for i in dependents {
            self.validate_field(i);
        }
        Ok(())
    }

    pub fn validate_all(&mut self) -> &ValidationResult {
        for i in 0..self.fields.len() {
            self.validate_field(i);
        }
        &self.validation
    }

    /// Validate, then create or update through exactly one API call
    pub async fn submit(&mut self) -> SubmitOutcome {
        match self.begin_submit() {
            Ok(pending) => {
                let result = pending.send().await;
                self.finish_submit(result)
            }
            Err(outcome) => outcome,
        }
    }

    /// Validate and shape the payload, then enter the saving state.
    /// `Err` carries the outcome when nothing is to be sent.
    pub fn begin_submit(&mut self) -> Result<PendingSave<F>, SubmitOutcome> {
        if self.saving || self.draft.is_none() {
            debug!(saving = self.saving, "Submit ignored");
            return Err(SubmitOutcome::Ignored);
        }

        if self.validate_all().has_errors() {
            let order: Vec<&str> = self.fields.iter().map(|f| f.name).collect();
            let message = self.validation.aggregate(&order);
            debug!(fields = ?self.validation.fields().collect::<Vec<_>>(), "Submit blocked by validation");
            self.notifier.error(message.clone());
            return Err(SubmitOutcome::Invalid(message));
        }

        let Some(draft) = self.draft.as_ref() else {
            return Err(SubmitOutcome::Ignored);
        };
        let payload = match self.form.to_payload(draft) {
            Ok(payload) => payload,
            Err(e) => {
                let message = e.to_string();
                self.notifier.error(message.clone());
                return Err(SubmitOutcome::Invalid(message));
            }
        };

        self.saving = true;
        Ok(PendingSave {
            form: Arc::clone(&self.form),
            id: self.editing_id.clone(),
            payload,
        })
    }

    /// Leave the saving state and report the result of a `PendingSave`
    pub fn finish_submit(&mut self, result: Result<Value, ApiError>) -> SubmitOutcome {
        self.saving = false;
        match result {
            Ok(_) => {
                let message = if self.editing_id.is_some() {
                    self.intl.text(&self.form.edit_success())
                } else {
                    self.intl.text(&self.form.add_success())
                };
                info!(id = ?self.editing_id, "Saved entity");
                self.notifier.success(message.clone());
                if let Some(trigger) = &self.reload {
                    trigger.request();
                }
                self.close();
                SubmitOutcome::Saved(message)
            }
            Err(e) => {
                warn!("Save failed: {}", e);
                let message = e.user_message(self.intl.as_ref());
                self.notifier.error(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    /// Discard the draft without contacting the backend
    pub fn cancel(&mut self) {
        if self.saving {
            debug!("Cancel ignored while saving");
            return;
        }
        debug!("Draft cancelled");
        self.close();
    }

    fn close(&mut self) {
        self.draft = None;
        self.editing_id = None;
        self.validation = ValidationResult::new();
    }
}

/// Read a draft field as text
pub fn draft_text(draft: &Draft, name: &str) -> String {
    value_text(draft.get(name).unwrap_or(&Value::Null))
}

/// Read a draft field as an unsigned integer
pub fn draft_u64(draft: &Draft, name: &str) -> Result<u64, FormError> {
    let text = draft_text(draft, name);
    text.trim().parse::<u64>().map_err(|_| FormError::InvalidField {
        field: name.to_string(),
        reason: format!("'{text}' is not a whole number"),
    })
}

/// Read a draft field as a boolean; accepts JSON booleans and "true"/"false" text
pub fn draft_bool(draft: &Draft, name: &str) -> bool {
    match draft.get(name) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
        _ => false,
    }
}
