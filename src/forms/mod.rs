// ABOUTME: Concrete entity forms and the add-role wizard built on the generic controllers

pub mod api_category;
pub mod application_policy;
pub mod deny_policy;
pub mod role_wizard;

pub use api_category::ApiCategoryForm;
pub use application_policy::ApplicationPolicyForm;
pub use deny_policy::DenyPolicyForm;
pub use role_wizard::{AddRoleWizard, RoleAddSink, RoleDraft, SaveStrategy, SystemScopesSink, WizardOutcome};

use crate::api::ResourceFamily;
use std::fmt;
use std::str::FromStr;

/// Forms that can be driven from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    ApplicationPolicy,
    DenyPolicy,
    ApiCategory,
}

impl FormKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormKind::ApplicationPolicy => "application-policy",
            FormKind::DenyPolicy => "deny-policy",
            FormKind::ApiCategory => "api-category",
        }
    }

    pub fn family(&self) -> ResourceFamily {
        match self {
            FormKind::ApplicationPolicy => ResourceFamily::ApplicationPolicies,
            FormKind::DenyPolicy => ResourceFamily::DenyPolicies,
            FormKind::ApiCategory => ResourceFamily::ApiCategories,
        }
    }
}

impl fmt::Display for FormKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "application-policy" => Ok(FormKind::ApplicationPolicy),
            "deny-policy" => Ok(FormKind::DenyPolicy),
            "api-category" => Ok(FormKind::ApiCategory),
            other => Err(format!(
                "unknown form '{other}' (expected application-policy, deny-policy or api-category)"
            )),
        }
    }
}
