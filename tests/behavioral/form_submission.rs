// ABOUTME: Behavioral tests for the form controller with the concrete entity forms
// Verifies validation gating, the edit round trip, variant field switching and save outcomes

use crate::fixtures::Harness;
use apim_console::api::{HttpMethod, ResourceFamily};
use apim_console::controllers::{Draft, FormController, OpenOutcome, ReloadTrigger, SubmitOutcome};
use apim_console::forms::{ApiCategoryForm, ApplicationPolicyForm, DenyPolicyForm};
use apim_console::notify::NotificationType;
use pretty_assertions::assert_eq;
use serde_json::json;

fn policy_form(h: &Harness) -> FormController<ApplicationPolicyForm> {
    let form = ApplicationPolicyForm::new(h.api.resource(ResourceFamily::ApplicationPolicies));
    FormController::new(form, h.intl.clone(), h.log.clone())
}

fn deny_form(h: &Harness) -> FormController<DenyPolicyForm> {
    let form = DenyPolicyForm::new(h.api.resource(ResourceFamily::DenyPolicies));
    FormController::new(form, h.intl.clone(), h.log.clone())
}

#[tokio::test]
async fn test_empty_policy_name_blocks_submit_without_network() {
    let h = Harness::new();
    let mut form = policy_form(&h);
    form.open(None).await;
    form.set_field("requestCount", "10").unwrap();
    form.set_field("unitTime", "1").unwrap();

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Invalid("Name is Empty".to_string()));
    assert_eq!(form.validation().error("policyName"), Some("Name is Empty"));
    assert_eq!(h.backend.request_count(), 0);
    assert_eq!(
        h.last_notification(),
        Some((NotificationType::Error, "Name is Empty".to_string()))
    );
    assert!(form.is_open());
}

#[tokio::test]
async fn test_aggregated_message_lists_every_invalid_field() {
    let h = Harness::new();
    let mut form = policy_form(&h);
    form.open(None).await;

    let outcome = form.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Invalid("Name is Empty\nRequest Count is Empty\nUnit Time is Empty".to_string())
    );
    assert_eq!(h.backend.request_count(), 0);
}

#[tokio::test]
async fn test_fixing_a_field_clears_only_its_error() {
    let h = Harness::new();
    let mut form = policy_form(&h);
    form.open(None).await;
    form.validate_all();
    assert!(form.validation().error("unitTime").is_some());

    form.set_field("policyName", "Gold").unwrap();
    assert_eq!(form.validation().error("policyName"), None);
    assert!(form.validation().error("unitTime").is_some());
}

#[tokio::test]
async fn test_switching_limit_type_revalidates_variant_fields() {
    let h = Harness::new();
    let mut form = policy_form(&h);
    form.open(None).await;
    form.validate_all();
    assert!(form.validation().error("requestCount").is_some());
    assert_eq!(form.validation().error("dataAmount"), None);

    form.set_field("type", "BANDWIDTHLIMIT").unwrap();
    assert_eq!(form.validation().error("requestCount"), None);
    assert_eq!(form.validation().error("dataAmount"), Some("Data Amount is Empty"));
}

#[tokio::test]
async fn test_edit_round_trip_reproduces_entity() {
    let h = Harness::new();
    let entity = json!({
        "policyName": "10PerMin",
        "description": "Allows 10 requests per minute",
        "defaultLimit": {
            "type": "REQUESTCOUNTLIMIT",
            "requestCount": {"timeUnit": "min", "unitTime": 1, "requestCount": 10}
        },
        "burstLimit": {"rateLimitCount": 5, "rateLimitTimeUnit": "sec"}
    });
    h.backend.respond(200, entity.clone()).respond(200, entity.clone());
    let trigger = ReloadTrigger::new();
    let mut form = policy_form(&h).with_reload(trigger.clone());

    assert_eq!(form.open(Some("p-1")).await, OpenOutcome::Opened);
    assert_eq!(form.editing_id(), Some("p-1"));
    let outcome = form.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Saved("Application Rate Limiting Policy edited successfully.".to_string())
    );
    let put = h.backend.last_request().unwrap();
    assert_eq!(put.method, HttpMethod::Put);
    assert_eq!(put.path, "/throttling/policies/application/p-1");
    assert_eq!(put.body, Some(entity));
    assert!(trigger.is_pending());
    assert!(!form.is_open());
}

#[tokio::test]
async fn test_reopening_replaces_residual_draft() {
    let h = Harness::new();
    h.backend
        .respond(200, json!({"id": "cat-1", "name": "Finance", "description": "Money APIs"}))
        .respond(200, json!({"id": "cat-2", "name": "Travel", "numberOfAPIs": 2}));
    let form = ApiCategoryForm::new(h.api.resource(ResourceFamily::ApiCategories));
    let mut form = FormController::new(form, h.intl.clone(), h.log.clone());

    form.open(Some("cat-1")).await;
    form.set_field("name", "Big Data").unwrap();
    assert!(form.validation().has_errors());

    assert_eq!(form.open(Some("cat-2")).await, OpenOutcome::Opened);

    let expected: Draft = [
        ("name".to_string(), json!("Travel")),
        ("description".to_string(), json!("")),
    ]
    .into_iter()
    .collect();
    assert_eq!(form.draft(), Some(&expected));
    assert_eq!(form.editing_id(), Some("cat-2"));
    assert!(!form.validation().has_errors());
    assert_eq!(form.validation().error("name"), None);
}

#[tokio::test]
async fn test_create_posts_to_collection() {
    let h = Harness::new();
    h.backend.respond(201, json!({"policyId": "new"}));
    let mut form = policy_form(&h);
    form.open(None).await;
    form.set_field("policyName", "Gold").unwrap();
    form.set_field("requestCount", 100).unwrap();
    form.set_field("unitTime", 1).unwrap();

    let outcome = form.submit().await;

    assert_eq!(
        outcome,
        SubmitOutcome::Saved("Application Rate Limiting Policy added successfully.".to_string())
    );
    let post = h.backend.last_request().unwrap();
    assert_eq!(post.method, HttpMethod::Post);
    assert_eq!(post.path, "/throttling/policies/application");
}

#[tokio::test]
async fn test_failed_save_keeps_draft_open() {
    let h = Harness::new();
    h.backend.respond(409, json!({"description": "Policy Gold already exists"}));
    let trigger = ReloadTrigger::new();
    let mut form = policy_form(&h).with_reload(trigger.clone());
    form.open(None).await;
    form.set_field("policyName", "Gold").unwrap();
    form.set_field("requestCount", 100).unwrap();
    form.set_field("unitTime", 1).unwrap();

    let outcome = form.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed("Policy Gold already exists".to_string()));
    assert!(form.is_open());
    assert_eq!(form.field("policyName"), Some(&json!("Gold")));
    assert!(!trigger.is_pending());
}

#[tokio::test]
async fn test_open_missing_entity_reports_not_found() {
    let h = Harness::new();
    h.backend.respond(404, json!({"code": 404}));
    let mut form = policy_form(&h);

    assert_eq!(form.open(Some("gone")).await, OpenOutcome::NotFound);
    assert!(!form.is_open());
    assert!(h.log.is_empty());
}

#[tokio::test]
async fn test_cancel_discards_without_network() {
    let h = Harness::new();
    let mut form = policy_form(&h);
    form.open(None).await;
    form.set_field("policyName", "Gold").unwrap();

    form.cancel();

    assert!(!form.is_open());
    assert_eq!(form.submit().await, SubmitOutcome::Ignored);
    assert_eq!(h.backend.request_count(), 0);
}

#[tokio::test]
async fn test_starting_ip_must_be_an_address_literal() {
    let h = Harness::new();
    let mut form = deny_form(&h);
    form.open(None).await;
    form.set_field("conditionType", "IPRANGE").unwrap();

    form.set_field("startingIp", "300.1.1.1").unwrap();
    assert_eq!(
        form.validation().error("startingIp"),
        Some("Starting Ip address entered is not valid.")
    );

    form.set_field("startingIp", "127.0.0.1").unwrap();
    assert_eq!(form.validation().error("startingIp"), None);

    form.set_field("startingIp", "2001:db8::1").unwrap();
    assert_eq!(form.validation().error("startingIp"), None);
}

#[tokio::test]
async fn test_deny_policy_create_strips_other_condition_fields() {
    let h = Harness::new();
    h.backend.respond(201, json!({"conditionId": "c-1"}));
    let mut form = deny_form(&h);
    form.open(None).await;
    form.set_field("conditionType", "IP").unwrap();
    form.set_field("fixedIp", "10.1.1.1").unwrap();
    form.set_field("conditionValue", "should-not-be-sent").unwrap();

    assert_eq!(
        form.submit().await,
        SubmitOutcome::Saved("Deny Policy added successfully.".to_string())
    );
    assert_eq!(
        h.backend.last_request().unwrap().body,
        Some(json!({
            "conditionType": "IP",
            "conditionValue": {"fixedIp": "10.1.1.1", "invert": false},
            "conditionStatus": true
        }))
    );
}

#[tokio::test]
async fn test_deny_policy_edit_patches_status_only() {
    let h = Harness::new();
    h.backend
        .respond(
            200,
            json!({
                "conditionId": "c-1",
                "conditionType": "USER",
                "conditionValue": "mallory",
                "conditionStatus": true
            }),
        )
        .respond(200, json!({"conditionStatus": false}));
    let mut form = deny_form(&h);
    form.open(Some("c-1")).await;
    form.set_field("conditionStatus", false).unwrap();

    form.submit().await;

    let patch = h.backend.last_request().unwrap();
    assert_eq!(patch.method, HttpMethod::Patch);
    assert_eq!(patch.path, "/throttling/deny-policy/c-1");
    assert_eq!(patch.body, Some(json!({"conditionStatus": false})));
}

#[tokio::test]
async fn test_category_name_with_spaces_is_rejected() {
    let h = Harness::new();
    let form = ApiCategoryForm::new(h.api.resource(ResourceFamily::ApiCategories));
    let mut form = FormController::new(form, h.intl.clone(), h.log.clone());
    form.open(None).await;
    form.set_field("name", "Big Data").unwrap();

    assert_eq!(
        form.submit().await,
        SubmitOutcome::Invalid("Name contains spaces".to_string())
    );
    assert_eq!(h.backend.request_count(), 0);
}
