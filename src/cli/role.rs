// ABOUTME: Role add command - runs the add-role wizard non-interactively
//
// Loads the current role aliases and scope mappings, then walks the wizard's two
// steps with the name and strategy given on the command line.

use super::util::print_json;
use super::{Console, OutputFormat, RoleAddArgs};
use crate::api::{group_scopes, scope_app};
use crate::forms::{AddRoleWizard, SaveStrategy, SystemScopesSink, WizardOutcome};
use anyhow::{anyhow, Context, Result};
use serde_json::json;
use std::sync::Arc;

/// Execute the role add command
pub async fn add(console: &Console, args: RoleAddArgs, format: OutputFormat) -> Result<()> {
    let (aliases, scopes) = tokio::try_join!(console.api.role_aliases(), console.api.system_scopes())
        .context("Failed to load role aliases and scope mappings")?;

    let mut wizard = AddRoleWizard::new(
        console.api.clone(),
        group_scopes(&scopes),
        aliases,
        Arc::new(SystemScopesSink::new(console.api.clone())),
        console.intl.clone(),
        console.notifier.clone(),
    );

    wizard.set_role(&args.name);
    wizard.next().map_err(|message| anyhow!(message))?;

    if args.scopes.is_empty() {
        wizard.select_strategy(SaveStrategy::RoleAlias);
        wizard.set_mapped_roles(args.aliases);
    } else {
        wizard.select_strategy(SaveStrategy::SelectPermissions);
        for scope in &args.scopes {
            if !wizard.toggle_permission(scope_app(scope), scope, true) {
                return Err(anyhow!("Unknown scope '{scope}'"));
            }
        }
    }

    let strategy = wizard.draft().strategy;
    let role = wizard.draft().role.clone();
    let outcome = wizard.submit().await;

    if format == OutputFormat::Json {
        let (status, message) = match &outcome {
            WizardOutcome::Saved(m) => ("saved", m.as_str()),
            WizardOutcome::Blocked(m) => ("blocked", m.as_str()),
            WizardOutcome::Failed(m) => ("failed", m.as_str()),
            WizardOutcome::Ignored => ("ignored", ""),
        };
        print_json(&json!({
            "role": role,
            "strategy": strategy.as_str(),
            "outcome": status,
            "message": message,
        }))?;
    }

    match outcome {
        WizardOutcome::Saved(_) => Ok(()),
        _ => Err(anyhow!("Role '{role}' was not added")),
    }
}
