// ABOUTME: Behavioral tests for confirm-then-delete wired to a list controller's reload trigger

use crate::fixtures::Harness;
use apim_console::api::{HttpMethod, ResourceFamily};
use apim_console::controllers::list::{json_search_text, Loader, SearchText};
use apim_console::controllers::{ConfirmChoice, DeleteAction, DeleteOutcome, ListController, ListState};
use futures_util::FutureExt;
use serde_json::{json, Value};
use std::sync::Arc;

fn deny_list(h: &Harness) -> ListController<Value> {
    let resource = h.api.resource(ResourceFamily::DenyPolicies);
    let loader: Loader<Value> = Arc::new(move || {
        let resource = resource.clone();
        async move { resource.fetch_list().await.map(Some) }.boxed()
    });
    let search: SearchText<Value> = Arc::new(json_search_text);
    ListController::new(loader, search, h.intl.clone())
}

#[tokio::test]
async fn test_confirmed_delete_refreshes_list() {
    let h = Harness::new();
    h.backend
        .respond(200, json!({"count": 1, "list": [{"conditionId": "c-1", "conditionType": "USER"}]}))
        .respond(200, Value::Null)
        .respond(200, json!({"count": 0, "list": []}));
    let mut list = deny_list(&h);
    list.reload().await;

    let mut action = DeleteAction::new(
        h.api.resource(ResourceFamily::DenyPolicies),
        h.intl.clone(),
        h.log.clone(),
    )
    .with_reload(list.trigger());

    let confirmation = action.request("c-1");
    assert_eq!(confirmation.title, "Delete Deny Policy?");
    assert_eq!(confirmation.selection, ConfirmChoice::No);
    action.confirmation_mut().unwrap().toggle();

    assert_eq!(
        action.confirm().await,
        DeleteOutcome::Deleted("Deny Policy deleted successfully".to_string())
    );
    let requests = h.backend.requests();
    assert_eq!(requests[1].method, HttpMethod::Delete);
    assert_eq!(requests[1].path, "/throttling/deny-policy/c-1");

    assert!(list.tick().await);
    assert!(matches!(list.state(), ListState::Empty));
}

#[tokio::test]
async fn test_cancel_closes_dialog_without_request() {
    let h = Harness::new();
    let mut action = DeleteAction::new(
        h.api.resource(ResourceFamily::ApiCategories),
        h.intl.clone(),
        h.log.clone(),
    );

    action.request("cat-1");
    action.cancel();

    assert!(action.confirmation().is_none());
    assert_eq!(action.confirm().await, DeleteOutcome::Cancelled);
    assert_eq!(h.backend.request_count(), 0);
}

#[tokio::test]
async fn test_transport_failure_surfaces_generic_message() {
    let h = Harness::new();
    h.backend.fail("timed out");
    let action = DeleteAction::new(
        h.api.resource(ResourceFamily::KeyManagers),
        h.intl.clone(),
        h.log.clone(),
    );

    assert_eq!(
        action.delete_now("km-1").await,
        DeleteOutcome::Failed("Something went wrong".to_string())
    );
}
