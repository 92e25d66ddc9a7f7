// ABOUTME: Two-step wizard adding a role: name it, then either alias existing roles
// or grant it explicit permissions; the two save strategies validate independently

use crate::api::{flatten_scopes, AdminApi, ApiError};
use crate::controllers::wizard::{WizardController, WizardStep};
use crate::i18n::{Localizer, Message};
use crate::models::{permission_mappings, AppMappings, RoleAliasList};
use crate::notify::Notifier;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ROLE_EMPTY_WARNING: Message =
    Message::new("RolePermissions.Common.AddRoleWizard.add.role.warn.empty", "Role name can not be empty!");
pub const PERMISSION_REQUIRED: Message = Message::new(
    "RolePermissions.Common.AddRoleWizard.add.scope.error.empty.permission",
    "You need to select at least one permission!",
);
pub const SCOPE_SUCCESS: Message = Message::new(
    "RolePermissions.Common.AddRoleWizard.add.scope.success",
    "Added scope mapping for {newRole} successfully",
);
pub const SCOPE_ERROR: Message = Message::new(
    "RolePermissions.Common.AddRoleWizard.add.scope.error",
    "Something went wrong while adding new scope mapping",
);
pub const MAPPED_ROLE_REQUIRED: Message = Message::new(
    "RolePermissions.Common.AddRoleWizard.add.scope.error.role.empty",
    "Mapped role selection can't be empty!",
);
pub const ALIAS_SUCCESS: Message = Message::new(
    "RolePermissions.Common.AddRoleWizard.add.scope.error.add.role.alias.success",
    "Add new alias for {newRole} successfully",
);
pub const ALIAS_ERROR: Message = Message::new(
    "RolePermissions.Common.AddRoleWizard.add.scope.error.add.role.alias",
    "Something went wrong while adding new role alias",
);
pub const STEP_ROLE_NAME: Message =
    Message::new("RolePermissions.Common.AddRoleWizard.add.provide.role.text", "Provide role name");
pub const STEP_PERMISSIONS: Message = Message::new(
    "RolePermissions.Common.AddRoleWizard.add.provide.select.permissions",
    "Select permissions",
);

const ROLE_NAME_EMPTY: &str = "Role name can't be empty!";
const NAME_STEP: usize = 0;
const PERMISSIONS_STEP: usize = 1;
const ROLE_EXISTS: &str = "Permission mapping exist";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveStrategy {
    #[default]
    RoleAlias,
    SelectPermissions,
}

impl SaveStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaveStrategy::RoleAlias => "role-alias",
            SaveStrategy::SelectPermissions => "select-permissions",
        }
    }
}

impl fmt::Display for SaveStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SaveStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "role-alias" => Ok(SaveStrategy::RoleAlias),
            "select-permissions" => Ok(SaveStrategy::SelectPermissions),
            other => Err(format!("unknown save strategy '{other}'")),
        }
    }
}

/// Everything the wizard edits; snapshotted per step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoleDraft {
    pub role: String,
    pub strategy: SaveStrategy,
    pub mapped_roles: Vec<String>,
    pub app_mappings: AppMappings,
    /// Last checked state per scope name
    pub permission_checks: BTreeMap<String, bool>,
}

/// Receives the edited scope mappings when the explicit-permissions strategy saves
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleAddSink: Send + Sync {
    async fn add_role(&self, app_mappings: AppMappings) -> Result<(), ApiError>;
}

/// Persists edited scope mappings through `PUT /system-scopes`
pub struct SystemScopesSink {
    api: AdminApi,
}

impl SystemScopesSink {
    pub fn new(api: AdminApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RoleAddSink for SystemScopesSink {
    async fn add_role(&self, app_mappings: AppMappings) -> Result<(), ApiError> {
        self.api.update_system_scopes(&flatten_scopes(&app_mappings)).await?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardOutcome {
    Saved(String),
    /// Strategy validation failed; nothing was sent
    Blocked(String),
    Failed(String),
    Ignored,
}

pub struct AddRoleWizard {
    wizard: WizardController<RoleDraft>,
    existing_roles: Arc<BTreeSet<String>>,
    role_error: Option<String>,
    role_aliases: RoleAliasList,
    api: AdminApi,
    sink: Arc<dyn RoleAddSink>,
    intl: Arc<dyn Localizer>,
    notifier: Arc<dyn Notifier>,
    closed: bool,
}

impl AddRoleWizard {
    pub fn new(
        api: AdminApi,
        app_mappings: AppMappings,
        role_aliases: RoleAliasList,
        sink: Arc<dyn RoleAddSink>,
        intl: Arc<dyn Localizer>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let existing_roles: Arc<BTreeSet<String>> =
            Arc::new(permission_mappings(&app_mappings).into_keys().collect());

        let roles = Arc::clone(&existing_roles);
        let empty_warning = intl.text(&ROLE_EMPTY_WARNING);
        let steps = vec![
            WizardStep::new(intl.text(&STEP_ROLE_NAME)).validated_by(move |draft: &RoleDraft| {
                if draft.role.is_empty() {
                    Some(empty_warning.clone())
                } else if roles.contains(&draft.role) {
                    Some(ROLE_EXISTS.to_string())
                } else {
                    None
                }
            }),
            WizardStep::new(intl.text(&STEP_PERMISSIONS)),
        ];

        let draft = RoleDraft {
            app_mappings,
            ..RoleDraft::default()
        };

        Self {
            wizard: WizardController::new(steps, draft),
            existing_roles,
            role_error: None,
            role_aliases,
            api,
            sink,
            intl,
            notifier,
            closed: false,
        }
    }

    pub fn draft(&self) -> &RoleDraft {
        self.wizard.draft()
    }

    pub fn current_step(&self) -> usize {
        self.wizard.current_step()
    }

    pub fn step_names(&self) -> Vec<&str> {
        self.wizard.step_names()
    }

    pub fn is_submitting(&self) -> bool {
        self.wizard.is_submitting()
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn role_aliases(&self) -> &RoleAliasList {
        &self.role_aliases
    }

    /// Inline error for the role name field
    pub fn role_error(&self) -> Option<&str> {
        self.role_error.as_deref()
    }

    /// Set the (trimmed) role name and recompute its inline error.
    /// Ignored once the wizard has left the name step.
    pub fn set_role(&mut self, value: &str) -> Option<&str> {
        if !self.on_step(NAME_STEP, "set_role") {
            return self.role_error.as_deref();
        }
        let trimmed = value.trim().to_string();
        self.role_error = if trimmed.is_empty() {
            Some(ROLE_NAME_EMPTY.to_string())
        } else if self.existing_roles.contains(&trimmed) {
            Some(ROLE_EXISTS.to_string())
        } else {
            None
        };
        self.wizard.draft_mut().role = trimmed;
        self.role_error.as_deref()
    }

    /// False when not on the permissions step
    pub fn select_strategy(&mut self, strategy: SaveStrategy) -> bool {
        if !self.on_step(PERMISSIONS_STEP, "select_strategy") {
            return false;
        }
        self.wizard.draft_mut().strategy = strategy;
        true
    }

    /// False when not on the permissions step
    pub fn set_mapped_roles(&mut self, roles: Vec<String>) -> bool {
        if !self.on_step(PERMISSIONS_STEP, "set_mapped_roles") {
            return false;
        }
        self.wizard.draft_mut().mapped_roles = roles;
        true
    }

    /// Grant or revoke `scope` in `app` for the new role; false when not on the
    /// permissions step or no such scope exists
    pub fn toggle_permission(&mut self, app: &str, scope: &str, checked: bool) -> bool {
        if !self.on_step(PERMISSIONS_STEP, "toggle_permission") {
            return false;
        }
        let draft = self.wizard.draft_mut();
        let role = draft.role.clone();
        let Some(target) = draft
            .app_mappings
            .get_mut(app)
            .and_then(|scopes| scopes.iter_mut().find(|s| s.name == scope))
        else {
            return false;
        };

        if checked {
            if !target.roles.contains(&role) {
                target.roles.push(role);
            }
        } else {
            target.roles.retain(|r| r != &role);
        }
        draft.permission_checks.insert(scope.to_string(), checked);
        true
    }

    fn on_step(&self, step: usize, action: &str) -> bool {
        let current = self.wizard.current_step();
        if current != step || self.wizard.is_submitting() {
            warn!(action, current, expected = step, "Add-role wizard edit ignored outside its step");
            return false;
        }
        true
    }

    /// Advance from the role name step; a blocked step raises a warning
    pub fn next(&mut self) -> Result<(), String> {
        match self.wizard.next() {
            Ok(step) => {
                debug!(step, role = %self.wizard.draft().role, "Add-role wizard advanced");
                Ok(())
            }
            Err(message) => {
                self.notifier.warning(message.clone());
                Err(message)
            }
        }
    }

    /// Back to the name step; permission edits are discarded
    pub fn back(&mut self) -> bool {
        self.wizard.back()
    }

    pub async fn submit(&mut self) -> WizardOutcome {
        if self.closed || !self.wizard.begin_submit() {
            return WizardOutcome::Ignored;
        }

        if let Some(message) = self.wizard.validate_step(NAME_STEP) {
            warn!(role = %self.wizard.draft().role, "Add-role submit blocked by name step: {}", message);
            self.wizard.finish_submit();
            self.notifier.warning(message.clone());
            return WizardOutcome::Blocked(message);
        }

        let outcome = match self.wizard.draft().strategy {
            SaveStrategy::SelectPermissions => self.save_permissions().await,
            SaveStrategy::RoleAlias => self.save_alias().await,
        };

        self.wizard.finish_submit();
        if matches!(outcome, WizardOutcome::Saved(_)) {
            self.closed = true;
        }
        outcome
    }

    async fn save_permissions(&self) -> WizardOutcome {
        let draft = self.wizard.draft();
        if !draft.permission_checks.values().any(|checked| *checked) {
            let message = self.intl.text(&PERMISSION_REQUIRED);
            self.notifier.warning(message.clone());
            return WizardOutcome::Blocked(message);
        }

        let role = draft.role.clone();
        match self.sink.add_role(draft.app_mappings.clone()).await {
            Ok(()) => {
                info!(%role, "Added scope mapping for new role");
                let message = self.intl.text_with(&SCOPE_SUCCESS, &[("newRole", role.as_str())]);
                self.notifier.info(message.clone());
                WizardOutcome::Saved(message)
            }
            Err(e) => {
                warn!(%role, "Adding scope mapping failed: {}", e);
                let message = self.intl.text(&SCOPE_ERROR);
                self.notifier.error(message.clone());
                WizardOutcome::Failed(message)
            }
        }
    }

    async fn save_alias(&mut self) -> WizardOutcome {
        let draft = self.wizard.draft();
        if draft.mapped_roles.is_empty() {
            let message = self.intl.text(&MAPPED_ROLE_REQUIRED);
            self.notifier.warning(message.clone());
            return WizardOutcome::Blocked(message);
        }

        let role = draft.role.clone();
        let updated = self.role_aliases.with_alias(&role, &draft.mapped_roles);
        match self.api.update_role_aliases(&updated).await {
            Ok(aliases) => {
                info!(%role, "Added role alias");
                self.role_aliases = aliases;
                let message = self.intl.text_with(&ALIAS_SUCCESS, &[("newRole", role.as_str())]);
                self.notifier.info(message.clone());
                WizardOutcome::Saved(message)
            }
            Err(e) => {
                warn!(%role, "Adding role alias failed: {}", e);
                let message = self.intl.text(&ALIAS_ERROR);
                self.notifier.error(message.clone());
                WizardOutcome::Failed(message)
            }
        }
    }
}
