// ABOUTME: Role alias and scope (permission) mapping models used by the add-role wizard

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAlias {
    pub role: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RoleAliasList {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub list: Vec<RoleAlias>,
}

impl RoleAliasList {
    pub fn new(list: Vec<RoleAlias>) -> Self {
        Self { count: list.len(), list }
    }

    /// Add `alias` to every target role, creating role entries that do not exist yet
    pub fn with_alias(&self, alias: &str, targets: &[String]) -> Self {
        let mut list = self.list.clone();
        for target in targets {
            match list.iter_mut().find(|entry| &entry.role == target) {
                Some(entry) => {
                    if !entry.aliases.iter().any(|a| a == alias) {
                        entry.aliases.push(alias.to_string());
                    }
                }
                None => list.push(RoleAlias {
                    role: target.clone(),
                    aliases: vec![alias.to_string()],
                }),
            }
        }
        Self::new(list)
    }
}

/// A permission (scope) and the roles granted it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScopeList {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub list: Vec<Scope>,
}

/// Scopes grouped by the application (portal) they belong to
pub type AppMappings = BTreeMap<String, Vec<Scope>>;

/// Invert app mappings into role name -> granted scope names
pub fn permission_mappings(app_mappings: &AppMappings) -> BTreeMap<String, Vec<String>> {
    let mut mappings: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for scope in app_mappings.values().flatten() {
        for role in &scope.roles {
            mappings.entry(role.clone()).or_default().push(scope.name.clone());
        }
    }
    mappings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_alias_appends_to_existing_role() {
        let aliases = RoleAliasList::new(vec![RoleAlias {
            role: "admin".to_string(),
            aliases: vec!["ops".to_string()],
        }]);

        let updated = aliases.with_alias("auditor", &["admin".to_string()]);
        assert_eq!(updated.list[0].aliases, vec!["ops", "auditor"]);
        assert_eq!(updated.count, 1);
    }

    #[test]
    fn test_permission_mappings_invert_scopes() {
        let mut app = AppMappings::new();
        app.insert(
            "apim".to_string(),
            vec![
                Scope { name: "apim:admin".to_string(), description: String::new(), roles: vec!["admin".to_string()] },
                Scope {
                    name: "apim:api_view".to_string(),
                    description: String::new(),
                    roles: vec!["admin".to_string(), "Internal/observer".to_string()],
                },
            ],
        );

        let mappings = permission_mappings(&app);
        assert_eq!(mappings["admin"], vec!["apim:admin", "apim:api_view"]);
        assert_eq!(mappings["Internal/observer"], vec!["apim:api_view"]);
    }

    #[test]
    fn test_with_alias_creates_missing_role() {
        let updated = RoleAliasList::default().with_alias("auditor", &["Internal/creator".to_string()]);
        assert_eq!(updated.list.len(), 1);
        assert_eq!(updated.list[0].role, "Internal/creator");
        assert_eq!(updated.list[0].aliases, vec!["auditor"]);
    }
}
