// ABOUTME: Localization capability injected into every controller
// Resolves stable message ids against a catalog, falling back to the literal default text

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A user-facing message: stable translation id plus literal fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    pub id: &'static str,
    pub default: &'static str,
}

impl Message {
    pub const fn new(id: &'static str, default: &'static str) -> Self {
        Self { id, default }
    }
}

/// Generic fallback used when the backend gives no error description
pub const GENERIC_ERROR: Message =
    Message::new("AdminPages.Addons.Generic.error", "Something went wrong");

pub trait Localizer: Send + Sync {
    /// Format a message by id, substituting `{name}` placeholders from `values`
    fn format_message(&self, id: &str, default_message: &str, values: &[(&str, &str)]) -> String;

    fn text(&self, message: &Message) -> String {
        self.format_message(message.id, message.default, &[])
    }

    fn text_with(&self, message: &Message, values: &[(&str, &str)]) -> String {
        self.format_message(message.id, message.default, values)
    }
}

/// Replace `{key}` placeholders in a template
fn interpolate(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{key}}}"), value);
    }
    out
}

/// Localizer that always uses the default message
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultLocalizer;

impl Localizer for DefaultLocalizer {
    fn format_message(&self, _id: &str, default_message: &str, values: &[(&str, &str)]) -> String {
        interpolate(default_message, values)
    }
}

/// Localizer backed by a flat `{ "id": "translated text" }` catalog
#[derive(Debug, Clone, Default)]
pub struct CatalogLocalizer {
    entries: HashMap<String, String>,
}

impl CatalogLocalizer {
    pub fn new(entries: HashMap<String, String>) -> Self {
        Self { entries }
    }

    /// Load a JSON catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read locale catalog {}", path.display()))?;
        let entries: HashMap<String, String> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse locale catalog {}", path.display()))?;
        tracing::debug!("Loaded {} catalog entries from {}", entries.len(), path.display());
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Localizer for CatalogLocalizer {
    fn format_message(&self, id: &str, default_message: &str, values: &[(&str, &str)]) -> String {
        let template = self.entries.get(id).map_or(default_message, String::as_str);
        interpolate(template, values)
    }
}
