// ABOUTME: Shared test fixtures and utilities for behavioral tests
//
// Provides:
// - FakeBackend: scripted Transport that records every request
// - Harness: AdminApi, localizer and notification log wired to a FakeBackend

use apim_console::api::{AdminApi, ApiError, ApiRequest, ApiResponse, Transport};
use apim_console::i18n::{DefaultLocalizer, Localizer};
use apim_console::notify::{NotificationLog, NotificationType};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Transport answering from a queue of scripted responses
#[derive(Default)]
pub struct FakeBackend {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<ApiResponse, ApiError>>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a response with the given status and JSON body
    pub fn respond(&self, status: u16, body: Value) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(ApiResponse::new(status, body)));
        self
    }

    /// Queue a transport-level failure
    pub fn fail(&self, message: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(ApiError::Transport(message.to_string())));
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn last_request(&self) -> Option<ApiRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Transport for FakeBackend {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(ApiError::Transport(format!(
                "no scripted response for {} {}",
                request.method, request.path
            )))
        })
    }
}

/// Everything a controller under test needs
pub struct Harness {
    pub backend: Arc<FakeBackend>,
    pub api: AdminApi,
    pub intl: Arc<dyn Localizer>,
    pub log: Arc<NotificationLog>,
}

impl Harness {
    pub fn new() -> Self {
        let backend = FakeBackend::new();
        let api = AdminApi::new(backend.clone());
        Self {
            backend,
            api,
            intl: Arc::new(DefaultLocalizer),
            log: Arc::new(NotificationLog::new()),
        }
    }

    /// Type and message of the most recent notification
    pub fn last_notification(&self) -> Option<(NotificationType, String)> {
        self.log.last().map(|n| (n.notification_type, n.message))
    }
}
