// ABOUTME: Shared CLI utilities for argument parsing and table output
//
// Provides consistent column selection and truncation across all CLI commands.

use crate::api::ResourceFamily;
use crate::controllers::validation::value_text;
use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

/// Parse a `FIELD=VALUE` assignment; the value is JSON when it parses as JSON, else text
pub fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((field.to_string(), value))
}

/// Field shown as the human-readable name of a row
pub fn name_field(family: ResourceFamily) -> &'static str {
    match family {
        ResourceFamily::ApplicationPolicies
        | ResourceFamily::SubscriptionPolicies
        | ResourceFamily::AdvancedPolicies => "policyName",
        ResourceFamily::DenyPolicies => "conditionType",
        ResourceFamily::ApiCategories | ResourceFamily::KeyManagers => "name",
    }
}

/// Field shown in the detail column of a row
pub fn detail_field(family: ResourceFamily) -> &'static str {
    match family {
        ResourceFamily::DenyPolicies => "conditionValue",
        _ => "description",
    }
}

/// Text of a row field for a table cell
pub fn cell(row: &Value, field: &str) -> String {
    match row.get(field) {
        None | Some(Value::Null) => "-".to_string(),
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| format!("{k}={}", value_text(v)))
            .collect::<Vec<_>>()
            .join(" "),
        Some(value) => value_text(value),
    }
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// Truncate a string to fit in the given width (character-aware for UTF-8)
pub fn truncate(s: &str, max_len: usize) -> String {
    if max_len <= 3 {
        return ".".repeat(max_len);
    }
    let char_count = s.chars().count();
    if char_count <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
