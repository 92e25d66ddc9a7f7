// ABOUTME: Behavioral tests for the list controller driven by a backend loader
// Verifies the loading/empty/error/populated views, client-side sort and search, and reload triggers

use crate::fixtures::Harness;
use apim_console::api::ResourceFamily;
use apim_console::controllers::list::{json_search_text, Loader, SearchText};
use apim_console::controllers::{ListController, ListState, ListView, SortOrder, SortValue};
use futures_util::FutureExt;
use serde_json::{json, Value};
use std::sync::Arc;

fn category_list(h: &Harness) -> ListController<Value> {
    let resource = h.api.resource(ResourceFamily::ApiCategories);
    let loader: Loader<Value> = Arc::new(move || {
        let resource = resource.clone();
        async move { resource.fetch_list().await.map(Some) }.boxed()
    });
    let search: SearchText<Value> = Arc::new(json_search_text);
    ListController::new(loader, search, h.intl.clone())
}

fn ids(view: ListView<'_, Value>) -> Vec<String> {
    match view {
        ListView::Table(rows) => rows
            .iter()
            .map(|r| r["id"].as_str().unwrap_or_default().to_string())
            .collect(),
        other => panic!("expected a table, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_collection_renders_no_data_message() {
    let h = Harness::new();
    h.backend.respond(200, json!({"count": 0, "list": []}));
    let mut list = category_list(&h);

    list.reload().await;

    assert!(matches!(list.state(), ListState::Empty));
    match list.view() {
        ListView::Empty(message) => assert_eq!(message, "No items yet"),
        other => panic!("expected the no-data view, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bare_array_response_populates() {
    let h = Harness::new();
    h.backend.respond(200, json!([{"id": "a", "name": "Finance"}]));
    let mut list = category_list(&h);

    list.reload().await;
    assert_eq!(list.rows().len(), 1);
}

#[tokio::test]
async fn test_backend_error_description_is_shown() {
    let h = Harness::new();
    h.backend.respond(500, json!({"description": "Database unavailable"}));
    let mut list = category_list(&h);

    list.reload().await;
    match list.view() {
        ListView::Error(message) => assert_eq!(message, "Database unavailable"),
        other => panic!("expected an error view, got {other:?}"),
    }
}

#[tokio::test]
async fn test_transport_failure_falls_back_to_generic_message() {
    let h = Harness::new();
    h.backend.fail("connection refused");
    let mut list = category_list(&h);

    list.reload().await;
    match list.view() {
        ListView::Error(message) => assert_eq!(message, "Something went wrong"),
        other => panic!("expected an error view, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sort_descending_reverses_ascending() {
    let h = Harness::new();
    h.backend.respond(
        200,
        json!({"count": 4, "list": [
            {"id": "c", "name": "Payments", "numberOfAPIs": 3},
            {"id": "a", "name": "Finance", "numberOfAPIs": 7},
            {"id": "d", "name": "weather", "numberOfAPIs": 1},
            {"id": "b", "name": "Maps"}
        ]}),
    );
    let mut list = category_list(&h);
    list.reload().await;

    list.sort_by_key(|row| SortValue::of(row, "name"), SortOrder::Ascending);
    let ascending = ids(list.view());
    assert_eq!(ascending, vec!["a", "b", "c", "d"]);

    list.sort_by_key(|row| SortValue::of(row, "name"), SortOrder::Descending);
    let mut descending = ids(list.view());
    descending.reverse();
    assert_eq!(descending, ascending);

    // Missing values sort before numbers
    list.sort_by_key(|row| SortValue::of(row, "numberOfAPIs"), SortOrder::Ascending);
    assert_eq!(ids(list.view()), vec!["b", "d", "c", "a"]);
}

#[tokio::test]
async fn test_search_filters_without_refetching() {
    let h = Harness::new();
    h.backend.respond(
        200,
        json!({"count": 2, "list": [
            {"id": "a", "name": "Finance", "description": "Money APIs"},
            {"id": "b", "name": "Maps", "description": "Geo APIs"}
        ]}),
    );
    let mut list = category_list(&h);
    list.reload().await;

    list.set_search("money");
    assert_eq!(ids(list.view()), vec!["a"]);
    assert_eq!(h.backend.request_count(), 1);
}

#[tokio::test]
async fn test_trigger_reloads_on_next_tick() {
    let h = Harness::new();
    h.backend
        .respond(200, json!({"count": 1, "list": [{"id": "a", "name": "Finance"}]}))
        .respond(200, json!({"count": 0, "list": []}));
    let mut list = category_list(&h);
    list.reload().await;
    list.set_search("fin");

    assert!(!list.tick().await);

    let trigger = list.trigger();
    trigger.request();
    assert!(list.tick().await);
    assert!(matches!(list.state(), ListState::Empty));
    assert_eq!(list.search(), "");
    assert_eq!(h.backend.request_count(), 2);
}

#[tokio::test]
async fn test_stale_load_is_discarded() {
    let h = Harness::new();
    h.backend
        .respond(200, json!({"count": 1, "list": [{"id": "old"}]}))
        .respond(200, json!({"count": 1, "list": [{"id": "new"}]}));
    let mut list = category_list(&h);

    let first = list.begin_reload().expect("loader-backed list");
    let second = list.begin_reload().expect("loader-backed list");

    let (old_ticket, old_result) = first.resolve().await;
    let (new_ticket, new_result) = second.resolve().await;

    assert!(list.apply(new_ticket, new_result));
    assert!(!list.apply(old_ticket, old_result));
    assert_eq!(ids(list.view()), vec!["new"]);
}

#[test]
fn test_static_collection_resolves_immediately() {
    let h = Harness::new();
    let search: SearchText<Value> = Arc::new(json_search_text);
    let mut list = ListController::from_static(vec![json!({"id": "x"})], search, h.intl.clone());
    assert_eq!(list.rows().len(), 1);

    list.replace_static(Vec::new());
    assert!(matches!(list.state(), ListState::Empty));
    assert_eq!(h.backend.request_count(), 0);
}
