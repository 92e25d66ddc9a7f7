// ABOUTME: Reusable UI-state controllers: list, form, wizard and delete action
// Front ends drive these and render the views they expose

pub mod delete;
pub mod form;
pub mod list;
pub mod validation;
pub mod wizard;

pub use delete::{ConfirmChoice, Confirmation, DeleteAction, DeleteMessages, DeleteOutcome};
pub use form::{
    Condition, Draft, EntityForm, FieldSpec, FormController, FormError, OpenOutcome, PendingSave,
    SubmitOutcome,
};
pub use list::{
    ListController, ListState, ListView, Loader, ReloadTrigger, SearchText, SortOrder, SortValue,
};
pub use validation::{Rule, ValidationResult};
pub use wizard::{WizardController, WizardStep};
