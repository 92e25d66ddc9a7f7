// ABOUTME: Save and deny-status commands - drive a FormController from the command line
//
// `save` opens a fresh or existing draft, applies each --set assignment in order,
// then submits once. Validation failures are reported without contacting the backend.

use super::util::print_json;
use super::{Console, DenyStatusArgs, OutputFormat, SaveArgs};
use crate::api::ResourceFamily;
use crate::controllers::{EntityForm, FormController, OpenOutcome, SubmitOutcome};
use crate::forms::{ApiCategoryForm, ApplicationPolicyForm, DenyPolicyForm, FormKind};
use anyhow::{anyhow, Result};
use serde_json::{json, Value};

/// Execute the save command
pub async fn execute(console: &Console, args: SaveArgs, format: OutputFormat) -> Result<()> {
    let resource = console.api.resource(args.form.family());
    let outcome = match args.form {
        FormKind::ApplicationPolicy => {
            run_form(console, ApplicationPolicyForm::new(resource), args.id.as_deref(), &args.assignments).await?
        }
        FormKind::DenyPolicy => {
            run_form(console, DenyPolicyForm::new(resource), args.id.as_deref(), &args.assignments).await?
        }
        FormKind::ApiCategory => {
            run_form(console, ApiCategoryForm::new(resource), args.id.as_deref(), &args.assignments).await?
        }
    };
    report(args.form.as_str(), args.id.as_deref(), outcome, format)
}

/// Execute the deny-status command
pub async fn deny_status(console: &Console, args: &DenyStatusArgs, format: OutputFormat) -> Result<()> {
    let form = DenyPolicyForm::new(console.api.resource(ResourceFamily::DenyPolicies));
    let assignments = vec![("conditionStatus".to_string(), json!(args.enabled))];
    let outcome = run_form(console, form, Some(&args.id), &assignments).await?;
    report(FormKind::DenyPolicy.as_str(), Some(&args.id), outcome, format)
}

/// Open, fill and submit one form
pub async fn run_form<F: EntityForm>(
    console: &Console,
    form: F,
    id: Option<&str>,
    assignments: &[(String, Value)],
) -> Result<SubmitOutcome> {
    let mut controller = FormController::new(form, console.intl.clone(), console.notifier.clone());

    match controller.open(id).await {
        OpenOutcome::Opened => {}
        OpenOutcome::NotFound => return Err(anyhow!(super::list::NOT_FOUND_TEXT)),
        OpenOutcome::Failed(message) => return Err(anyhow!(message)),
    }

    for (field, value) in assignments {
        controller.set_field(field, value.clone())?;
    }

    Ok(controller.submit().await)
}

fn report(form: &str, id: Option<&str>, outcome: SubmitOutcome, format: OutputFormat) -> Result<()> {
    let (status, message) = match &outcome {
        SubmitOutcome::Saved(message) => ("saved", message.clone()),
        SubmitOutcome::Invalid(message) => ("invalid", message.clone()),
        SubmitOutcome::Failed(message) => ("failed", message.clone()),
        SubmitOutcome::Ignored => ("ignored", String::new()),
    };

    if format == OutputFormat::Json {
        print_json(&json!({
            "form": form,
            "id": id,
            "outcome": status,
            "message": message,
        }))?;
    }

    match outcome {
        SubmitOutcome::Saved(_) => Ok(()),
        _ => Err(anyhow!("{form} was not saved ({status})")),
    }
}
