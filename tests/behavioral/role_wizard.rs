// ABOUTME: Behavioral tests for the add-role wizard
// Verifies step gating, back navigation and both save strategies against the fake backend

use crate::fixtures::Harness;
use apim_console::api::{group_scopes, ApiError, HttpMethod};
use apim_console::forms::{AddRoleWizard, RoleAddSink, SaveStrategy, SystemScopesSink, WizardOutcome};
use apim_console::models::{AppMappings, RoleAlias, RoleAliasList, Scope, ScopeList};
use apim_console::notify::NotificationType;
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Sink that records every mapping it is handed
#[derive(Default)]
struct RecordingSink {
    calls: Mutex<Vec<AppMappings>>,
}

#[async_trait]
impl RoleAddSink for RecordingSink {
    async fn add_role(&self, app_mappings: AppMappings) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(app_mappings);
        Ok(())
    }
}

fn scopes() -> ScopeList {
    let list = vec![
        Scope {
            name: "apim:admin".to_string(),
            description: "Manage all admin operations".to_string(),
            roles: vec!["admin".to_string()],
        },
        Scope {
            name: "apim:api_view".to_string(),
            description: "View API".to_string(),
            roles: vec!["admin".to_string(), "Internal/creator".to_string()],
        },
        Scope {
            name: "service_catalog:service_view".to_string(),
            description: "View services".to_string(),
            roles: vec![],
        },
    ];
    ScopeList { count: list.len(), list }
}

fn wizard(h: &Harness, sink: Arc<dyn RoleAddSink>, aliases: RoleAliasList) -> AddRoleWizard {
    AddRoleWizard::new(
        h.api.clone(),
        group_scopes(&scopes()),
        aliases,
        sink,
        h.intl.clone(),
        h.log.clone(),
    )
}

#[test]
fn test_existing_role_blocks_next() {
    let h = Harness::new();
    let mut w = wizard(&h, Arc::new(RecordingSink::default()), RoleAliasList::default());

    assert_eq!(w.set_role("Internal/creator"), Some("Permission mapping exist"));
    assert_eq!(w.next(), Err("Permission mapping exist".to_string()));
    assert_eq!(w.current_step(), 0);
    assert_eq!(
        h.last_notification(),
        Some((NotificationType::Warning, "Permission mapping exist".to_string()))
    );
}

#[test]
fn test_step_names_are_localized() {
    let h = Harness::new();
    let w = wizard(&h, Arc::new(RecordingSink::default()), RoleAliasList::default());
    assert_eq!(w.step_names(), vec!["Provide role name", "Select permissions"]);
}

#[tokio::test]
async fn test_zero_permissions_never_reaches_sink() {
    let h = Harness::new();
    let sink = Arc::new(RecordingSink::default());
    let mut w = wizard(&h, sink.clone(), RoleAliasList::default());

    w.set_role("auditor");
    w.next().unwrap();
    w.select_strategy(SaveStrategy::SelectPermissions);

    let outcome = w.submit().await;

    assert_eq!(
        outcome,
        WizardOutcome::Blocked("You need to select at least one permission!".to_string())
    );
    assert!(sink.calls.lock().unwrap().is_empty());
    assert!(!w.is_closed());
}

#[tokio::test]
async fn test_permission_strategy_ignores_alias_selection() {
    let h = Harness::new();
    let sink = Arc::new(RecordingSink::default());
    let mut w = wizard(&h, sink.clone(), RoleAliasList::default());

    w.set_role("auditor");
    w.next().unwrap();
    w.select_strategy(SaveStrategy::SelectPermissions);
    assert!(w.toggle_permission("apim", "apim:api_view", true));

    let outcome = w.submit().await;

    assert_eq!(
        outcome,
        WizardOutcome::Saved("Added scope mapping for auditor successfully".to_string())
    );
    let calls = sink.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let api_view = calls[0]["apim"].iter().find(|s| s.name == "apim:api_view").unwrap();
    assert!(api_view.roles.contains(&"auditor".to_string()));
    assert_eq!(h.backend.request_count(), 0);
    assert!(w.is_closed());
}

#[tokio::test]
async fn test_back_discards_permission_edits() {
    let h = Harness::new();
    let mut w = wizard(&h, Arc::new(RecordingSink::default()), RoleAliasList::default());

    w.set_role("auditor");
    w.next().unwrap();
    w.toggle_permission("apim", "apim:admin", true);
    assert!(w.back());
    assert_eq!(w.current_step(), 0);

    w.next().unwrap();
    assert!(w.draft().permission_checks.is_empty());
    let admin = w.draft().app_mappings["apim"].iter().find(|s| s.name == "apim:admin").unwrap();
    assert_eq!(admin.roles, vec!["admin".to_string()]);
}

#[tokio::test]
async fn test_rename_after_name_step_cannot_reuse_existing_role() {
    let h = Harness::new();
    h.backend.respond(200, json!({"count": 0, "list": []}));
    let mut w = wizard(&h, Arc::new(RecordingSink::default()), RoleAliasList::default());

    w.set_role("auditor");
    w.next().unwrap();
    assert!(w.set_mapped_roles(vec!["Internal/publisher".to_string()]));
    assert_eq!(w.set_role("admin"), None);
    assert_eq!(w.draft().role, "auditor");

    assert_eq!(w.submit().await, WizardOutcome::Saved("Add new alias for auditor successfully".to_string()));
    let put = h.backend.last_request().unwrap();
    assert_eq!(
        put.body,
        Some(json!({"count": 1, "list": [{"role": "Internal/publisher", "aliases": ["auditor"]}]}))
    );
}

#[tokio::test]
async fn test_permission_edits_before_naming_are_refused() {
    let h = Harness::new();
    let sink = Arc::new(RecordingSink::default());
    let mut w = wizard(&h, sink.clone(), RoleAliasList::default());

    assert!(!w.toggle_permission("apim", "apim:admin", true));
    assert!(!w.select_strategy(SaveStrategy::SelectPermissions));
    assert!(!w.set_mapped_roles(vec!["admin".to_string()]));
    assert!(w.draft().permission_checks.is_empty());

    w.set_role("auditor");
    w.next().unwrap();
    assert!(w.select_strategy(SaveStrategy::SelectPermissions));
    assert!(w.toggle_permission("apim", "apim:admin", true));

    assert!(matches!(w.submit().await, WizardOutcome::Saved(_)));
    let calls = sink.calls.lock().unwrap();
    let admin = calls[0]["apim"].iter().find(|s| s.name == "apim:admin").unwrap();
    assert_eq!(admin.roles, vec!["admin".to_string(), "auditor".to_string()]);
    assert!(calls[0].values().flatten().all(|s| !s.roles.contains(&String::new())));
}

#[tokio::test]
async fn test_alias_strategy_requires_a_mapped_role() {
    let h = Harness::new();
    let mut w = wizard(&h, Arc::new(RecordingSink::default()), RoleAliasList::default());

    w.set_role("auditor");
    w.next().unwrap();

    assert_eq!(
        w.submit().await,
        WizardOutcome::Blocked("Mapped role selection can't be empty!".to_string())
    );
    assert_eq!(h.backend.request_count(), 0);
}

#[tokio::test]
async fn test_alias_strategy_puts_role_alias_list() {
    let h = Harness::new();
    let existing = RoleAliasList::new(vec![RoleAlias {
        role: "admin".to_string(),
        aliases: vec!["superuser".to_string()],
    }]);
    let saved = json!({"count": 1, "list": [{"role": "admin", "aliases": ["superuser", "auditor"]}]});
    h.backend.respond(200, saved);
    let mut w = wizard(&h, Arc::new(RecordingSink::default()), existing);

    w.set_role("  auditor ");
    w.next().unwrap();
    w.set_mapped_roles(vec!["admin".to_string()]);

    let outcome = w.submit().await;

    assert_eq!(outcome, WizardOutcome::Saved("Add new alias for auditor successfully".to_string()));
    let put = h.backend.last_request().unwrap();
    assert_eq!(put.method, HttpMethod::Put);
    assert_eq!(put.path, "/system-scopes/role-aliases");
    assert_eq!(
        put.body,
        Some(json!({"count": 1, "list": [{"role": "admin", "aliases": ["superuser", "auditor"]}]}))
    );
    assert_eq!(w.role_aliases().list[0].aliases, vec!["superuser", "auditor"]);
    assert_eq!(
        h.last_notification(),
        Some((NotificationType::Info, "Add new alias for auditor successfully".to_string()))
    );
}

#[tokio::test]
async fn test_alias_failure_keeps_wizard_open() {
    let h = Harness::new();
    h.backend.respond(500, json!({"description": "boom"}));
    let mut w = wizard(&h, Arc::new(RecordingSink::default()), RoleAliasList::default());

    w.set_role("auditor");
    w.next().unwrap();
    w.set_mapped_roles(vec!["admin".to_string()]);

    assert_eq!(
        w.submit().await,
        WizardOutcome::Failed("Something went wrong while adding new role alias".to_string())
    );
    assert!(!w.is_closed());
    assert!(!w.is_submitting());
}

#[tokio::test]
async fn test_system_scopes_sink_puts_flattened_scopes() {
    let h = Harness::new();
    h.backend.respond(200, json!({"count": 0, "list": []}));
    let sink = SystemScopesSink::new(h.api.clone());

    sink.add_role(group_scopes(&scopes())).await.unwrap();

    let put = h.backend.last_request().unwrap();
    assert_eq!(put.method, HttpMethod::Put);
    assert_eq!(put.path, "/system-scopes");
    assert_eq!(put.body.unwrap()["count"], json!(3));
}
