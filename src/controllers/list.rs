// ABOUTME: List controller: loads a collection through an injected loader and serves
// searchable, stably sorted table views over it; stale loads are discarded by ticket

use crate::api::ApiError;
use crate::i18n::{Localizer, Message};
use futures_util::future::BoxFuture;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const NO_DATA_ERROR: Message =
    Message::new("AdminPages.Addons.ListBase.noDataError", "Error while retrieving data.");
pub const NO_DATA_MESSAGE: Message =
    Message::new("AdminPages.Addons.ListBase.nodata.message", "No items yet");

pub type LoaderFuture<T> = BoxFuture<'static, Result<Option<Vec<T>>, ApiError>>;

/// Produces a fresh collection; `Ok(None)` means the backend returned no data at all
pub type Loader<T> = Arc<dyn Fn() -> LoaderFuture<T> + Send + Sync>;

/// Text a row is searched by
pub type SearchText<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Loading,
    Error(String),
    Empty,
    Populated(Vec<T>),
}

/// What a front end should render right now
#[derive(Debug, PartialEq)]
pub enum ListView<'a, T> {
    Loading,
    Error(&'a str),
    Empty(&'a str),
    Table(Vec<&'a T>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Cloneable handle a form or delete action uses to ask the list to reload
#[derive(Debug, Clone, Default)]
pub struct ReloadTrigger {
    pending: Arc<AtomicBool>,
}

impl ReloadTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.pending.store(true, AtomicOrdering::SeqCst);
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(AtomicOrdering::SeqCst)
    }

    /// Clear the pending flag, returning whether it was set
    pub fn take(&self) -> bool {
        self.pending.swap(false, AtomicOrdering::SeqCst)
    }
}

/// A load that has been started but not yet applied
pub struct PendingLoad<T> {
    pub ticket: u64,
    future: LoaderFuture<T>,
}

impl<T> PendingLoad<T> {
    pub async fn resolve(self) -> (u64, Result<Option<Vec<T>>, ApiError>) {
        (self.ticket, self.future.await)
    }
}

enum Source<T> {
    Loader(Loader<T>),
    Static(Vec<T>),
}

pub struct ListController<T> {
    source: Source<T>,
    state: ListState<T>,
    latest_ticket: u64,
    search: String,
    search_text: SearchText<T>,
    case_sensitive: bool,
    no_data_message: String,
    intl: Arc<dyn Localizer>,
    trigger: ReloadTrigger,
}

impl<T: Clone + Send + 'static> ListController<T> {
    pub fn new(loader: Loader<T>, search_text: SearchText<T>, intl: Arc<dyn Localizer>) -> Self {
        Self::with_source(Source::Loader(loader), search_text, intl)
    }

    /// Serve a caller-supplied collection instead of calling a loader
    pub fn from_static(data: Vec<T>, search_text: SearchText<T>, intl: Arc<dyn Localizer>) -> Self {
        let mut controller = Self::with_source(Source::Static(Vec::new()), search_text, intl);
        controller.replace_static(data);
        controller
    }

    fn with_source(source: Source<T>, search_text: SearchText<T>, intl: Arc<dyn Localizer>) -> Self {
        let no_data_message = intl.text(&NO_DATA_MESSAGE);
        Self {
            source,
            state: ListState::Loading,
            latest_ticket: 0,
            search: String::new(),
            search_text,
            case_sensitive: false,
            no_data_message,
            intl,
            trigger: ReloadTrigger::new(),
        }
    }

    pub fn with_no_data_message(mut self, message: impl Into<String>) -> Self {
        self.no_data_message = message.into();
        self
    }

    pub fn with_case_sensitive_search(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn trigger(&self) -> ReloadTrigger {
        self.trigger.clone()
    }

    pub fn rows(&self) -> &[T] {
        match &self.state {
            ListState::Populated(rows) => rows,
            _ => &[],
        }
    }

    /// Enter `Loading` and start the loader; the caller resolves and applies the result
    pub fn begin_reload(&mut self) -> Option<PendingLoad<T>> {
        self.latest_ticket += 1;
        self.state = ListState::Loading;
        self.search.clear();
        let ticket = self.latest_ticket;

        let data = match &self.source {
            Source::Loader(loader) => {
                debug!(ticket, "List load started");
                return Some(PendingLoad { ticket, future: loader() });
            }
            Source::Static(data) => data.clone(),
        };
        self.apply(ticket, Ok(Some(data)));
        None
    }

    /// Apply a load result; returns false when the result is stale and was dropped
    pub fn apply(&mut self, ticket: u64, result: Result<Option<Vec<T>>, ApiError>) -> bool {
        if ticket != self.latest_ticket {
            debug!(ticket, latest = self.latest_ticket, "Discarding stale list load");
            return false;
        }

        self.state = match result {
            Ok(Some(rows)) if rows.is_empty() => ListState::Empty,
            Ok(Some(rows)) => {
                debug!(ticket, rows = rows.len(), "List load resolved");
                ListState::Populated(rows)
            }
            Ok(None) => {
                warn!(ticket, "List loader returned no data");
                ListState::Error(self.intl.text(&NO_DATA_ERROR))
            }
            Err(e) => {
                warn!(ticket, "List load failed: {}", e);
                ListState::Error(e.user_message(self.intl.as_ref()))
            }
        };
        true
    }

    /// Re-enter `Loading` and run the loader to completion, whatever the current state
    pub async fn reload(&mut self) {
        if let Some(pending) = self.begin_reload() {
            let (ticket, result) = pending.resolve().await;
            self.apply(ticket, result);
        }
    }

    /// Swap in a new static collection, resolving immediately
    pub fn replace_static(&mut self, data: Vec<T>) {
        self.source = Source::Static(data);
        self.begin_reload();
    }

    /// Perform a reload if one was requested through the trigger
    pub async fn tick(&mut self) -> bool {
        if !self.trigger.take() {
            return false;
        }
        info!("Reloading list after change");
        self.reload().await;
        true
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Stable sort of the loaded rows; ties keep their current relative order
    pub fn sort_by_key<K, F>(&mut self, key: F, order: SortOrder)
    where
        K: Ord,
        F: Fn(&T) -> K,
    {
        if let ListState::Populated(rows) = &mut self.state {
            match order {
                SortOrder::Ascending => rows.sort_by(|a, b| key(a).cmp(&key(b))),
                SortOrder::Descending => rows.sort_by(|a, b| key(b).cmp(&key(a))),
            }
        }
    }

    fn matches_search(&self, row: &T) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let text = (self.search_text)(row);
        if self.case_sensitive {
            text.contains(&self.search)
        } else {
            text.to_lowercase().contains(&self.search.to_lowercase())
        }
    }

    pub fn view(&self) -> ListView<'_, T> {
        match &self.state {
            ListState::Loading => ListView::Loading,
            ListState::Error(message) => ListView::Error(message),
            ListState::Empty => ListView::Empty(&self.no_data_message),
            ListState::Populated(rows) => {
                ListView::Table(rows.iter().filter(|row| self.matches_search(row)).collect())
            }
        }
    }
}

/// Orderable projection of a JSON field: missing < numbers < text
#[derive(Debug, Clone, PartialEq)]
pub enum SortValue {
    Missing,
    Number(f64),
    Text(String),
}

impl SortValue {
    pub fn of(row: &Value, field: &str) -> Self {
        match row.get(field) {
            None | Some(Value::Null) => SortValue::Missing,
            Some(Value::Number(n)) => n.as_f64().map_or(SortValue::Missing, SortValue::Number),
            Some(Value::String(s)) => SortValue::Text(s.to_lowercase()),
            Some(other) => SortValue::Text(other.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SortValue::Missing => 0,
            SortValue::Number(_) => 1,
            SortValue::Text(_) => 2,
        }
    }
}

impl Eq for SortValue {}

impl PartialOrd for SortValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SortValue {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortValue::Number(a), SortValue::Number(b)) => a.total_cmp(b),
            (SortValue::Text(a), SortValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// Search text for JSON rows: every top-level string or number field
pub fn json_search_text(row: &Value) -> String {
    match row {
        Value::Object(map) => map
            .values()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join(" "),
        other => other.to_string(),
    }
}
