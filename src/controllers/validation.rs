// ABOUTME: Declarative field validation rules and per-field validation results
// Rules run in order and the first failing rule supplies the field's message

use crate::i18n::{Localizer, Message};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::collections::BTreeMap;

lazy_static! {
    static ref IPV4: Regex = Regex::new(
        r"^(([0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])\.){3}([0-9]|[1-9][0-9]|1[0-9]{2}|2[0-4][0-9]|25[0-5])$"
    )
    .unwrap();
    static ref IPV6: Regex = Regex::new(concat!(
        r"^(([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}",
        r"|([0-9a-fA-F]{1,4}:){1,7}:",
        r"|([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}",
        r"|([0-9a-fA-F]{1,4}:){1,5}(:[0-9a-fA-F]{1,4}){1,2}",
        r"|([0-9a-fA-F]{1,4}:){1,4}(:[0-9a-fA-F]{1,4}){1,3}",
        r"|([0-9a-fA-F]{1,4}:){1,3}(:[0-9a-fA-F]{1,4}){1,4}",
        r"|([0-9a-fA-F]{1,4}:){1,2}(:[0-9a-fA-F]{1,4}){1,5}",
        r"|[0-9a-fA-F]{1,4}:((:[0-9a-fA-F]{1,4}){1,6})",
        r"|:((:[0-9a-fA-F]{1,4}){1,7}|:)",
        r"|fe80:(:[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]+",
        r"|::(ffff(:0{1,4})?:)?((25[0-5]|(2[0-4]|1?[0-9])?[0-9])\.){3}(25[0-5]|(2[0-4]|1?[0-9])?[0-9])",
        r"|([0-9a-fA-F]{1,4}:){1,4}:((25[0-5]|(2[0-4]|1?[0-9])?[0-9])\.){3}(25[0-5]|(2[0-4]|1?[0-9])?[0-9]))$",
    ))
    .unwrap();
}

/// IPv4 dotted quad or IPv6 literal (including zone-indexed link-local and v4-mapped forms)
pub fn is_ip_literal(value: &str) -> bool {
    IPV4.is_match(value) || IPV6.is_match(value)
}

/// Text form of a draft value; `null` reads as empty
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone)]
pub enum RuleKind {
    NonEmpty,
    NoWhitespace,
    MaxLength(usize),
    /// Fails when the pattern matches anywhere in the value
    Disallowed(Regex),
    /// Whole number greater than zero; empty input is left to `NonEmpty`
    PositiveInteger,
    IpAddress,
}

#[derive(Debug, Clone)]
pub struct Rule {
    pub kind: RuleKind,
    pub message: Message,
}

impl Rule {
    pub fn non_empty(message: Message) -> Self {
        Self { kind: RuleKind::NonEmpty, message }
    }

    pub fn no_whitespace(message: Message) -> Self {
        Self { kind: RuleKind::NoWhitespace, message }
    }

    pub fn max_length(limit: usize, message: Message) -> Self {
        Self { kind: RuleKind::MaxLength(limit), message }
    }

    pub fn disallowed(pattern: Regex, message: Message) -> Self {
        Self { kind: RuleKind::Disallowed(pattern), message }
    }

    pub fn positive_integer(message: Message) -> Self {
        Self { kind: RuleKind::PositiveInteger, message }
    }

    pub fn ip_address(message: Message) -> Self {
        Self { kind: RuleKind::IpAddress, message }
    }

    pub fn passes(&self, value: &Value) -> bool {
        let text = value_text(value);
        match &self.kind {
            RuleKind::NonEmpty => !text.is_empty(),
            RuleKind::NoWhitespace => !text.chars().any(char::is_whitespace),
            RuleKind::MaxLength(limit) => text.chars().count() <= *limit,
            RuleKind::Disallowed(pattern) => !pattern.is_match(&text),
            RuleKind::PositiveInteger => {
                if text.is_empty() {
                    return true;
                }
                matches!(text.trim().parse::<u64>(), Ok(n) if n > 0)
            }
            RuleKind::IpAddress => text.is_empty() || is_ip_literal(&text),
        }
    }
}

/// Run `rules` in order, returning the first failure's localized message
pub fn check(rules: &[Rule], value: &Value, intl: &dyn Localizer) -> Option<String> {
    rules
        .iter()
        .find(|rule| !rule.passes(value))
        .map(|rule| intl.text(&rule.message))
}

/// Field name to error message; a field without an entry has no error
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, error: Option<String>) {
        match error {
            Some(message) => {
                self.errors.insert(field.to_string(), message);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }

    pub fn clear(&mut self, field: &str) {
        self.errors.remove(field);
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// All messages joined by newlines, in the order the fields were declared
    pub fn aggregate(&self, order: &[&str]) -> String {
        let mut messages: Vec<&str> = order
            .iter()
            .filter_map(|field| self.errors.get(*field).map(String::as_str))
            .collect();
        for (field, message) in &self.errors {
            if !order.contains(&field.as_str()) {
                messages.push(message);
            }
        }
        messages.join("\n")
    }
}
