// ABOUTME: List and show commands - browse the entities of one resource family
//
// Drives a ListController with a backend loader so search, sort and the
// empty/error views behave exactly as in the interactive console.

use super::util::{cell, detail_field, name_field, print_json, truncate};
use super::{Console, ListArgs, OutputFormat, ShowArgs};
use crate::api::{ResourceClient, ResourceFamily};
use crate::controllers::list::{json_search_text, Loader, SearchText};
use crate::controllers::{ListController, ListView, SortOrder, SortValue};
use anyhow::{anyhow, Result};
use futures_util::FutureExt;
use serde_json::Value;
use std::sync::Arc;

/// Printed when `show` asks for an entity the backend does not have
pub const NOT_FOUND_TEXT: &str = "resource not found";

/// Build a list controller that loads `resource` on every reload
pub fn backend_list(console: &Console, resource: ResourceClient) -> ListController<Value> {
    let loader: Loader<Value> = Arc::new(move || {
        let resource = resource.clone();
        async move { resource.fetch_list().await.map(Some) }.boxed()
    });
    let search_text: SearchText<Value> = Arc::new(json_search_text);

    let mut list = ListController::new(loader, search_text, console.intl.clone())
        .with_case_sensitive_search(console.config.ui.case_sensitive_search());
    if let Some(message) = &console.config.ui.no_data_message {
        list = list.with_no_data_message(message.clone());
    }
    list
}

/// Execute the list command
pub async fn execute(console: &Console, args: ListArgs, format: OutputFormat) -> Result<()> {
    let family = args.family;
    let mut list = backend_list(console, console.api.resource(family));
    list.reload().await;

    if let Some(search) = args.search {
        list.set_search(search);
    }
    if let Some(field) = args.sort {
        let order = if args.desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        };
        list.sort_by_key(|row| SortValue::of(row, &field), order);
    }

    match list.view() {
        ListView::Loading => Err(anyhow!("list did not finish loading")),
        ListView::Error(message) => Err(anyhow!("{message}")),
        ListView::Empty(message) => {
            match format {
                OutputFormat::Json => print_json(&Vec::<Value>::new())?,
                OutputFormat::Text => println!("{message}"),
            }
            Ok(())
        }
        ListView::Table(rows) => {
            match format {
                OutputFormat::Json => print_json(&rows)?,
                OutputFormat::Text => output_text(family, &rows),
            }
            Ok(())
        }
    }
}

/// Output rows as a text table
fn output_text(family: ResourceFamily, rows: &[&Value]) {
    if rows.is_empty() {
        println!("No matching {family} found.");
        return;
    }

    println!("{:<38} {:<30} DETAIL", "ID", "NAME");
    let separator = "-".repeat(100);
    println!("{separator}");

    let (id_field, name, detail) = (family.id_field(), name_field(family), detail_field(family));
    for row in rows {
        println!(
            "{:<38} {:<30} {}",
            truncate(&cell(row, id_field), 38),
            truncate(&cell(row, name), 30),
            truncate(&cell(row, detail), 50)
        );
    }
}

/// Execute the show command
pub async fn show(console: &Console, args: &ShowArgs, format: OutputFormat) -> Result<()> {
    let entity = match console.api.resource(args.family).fetch(&args.id).await {
        Ok(entity) => entity,
        Err(e) if e.is_not_found() => {
            tracing::info!(family = %args.family, id = %args.id, "Entity not found");
            return Err(anyhow!(NOT_FOUND_TEXT));
        }
        Err(e) => return Err(anyhow!(e.user_message(console.intl.as_ref()))),
    };

    match format {
        OutputFormat::Json => print_json(&entity)?,
        OutputFormat::Text => output_entity(&entity),
    }
    Ok(())
}

/// Output one entity as `key: value` lines
fn output_entity(entity: &Value) {
    match entity {
        Value::Object(map) => {
            for key in map.keys() {
                println!("{key:<24} {}", cell(entity, key));
            }
        }
        other => println!("{other}"),
    }
}
