// ABOUTME: HTTP transport for the admin REST API
// Resolves on every HTTP completion; only network-level failures become errors

use crate::api::types::{ApiError, ApiRequest, ApiResponse, HttpMethod};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

/// Sends one request, at most once
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError>;
}

/// Connection settings for `HttpTransport`
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub base_url: String,
    pub api_path: String,
    pub timeout: Duration,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
    pub token: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            base_url: "https://localhost:9443".to_string(),
            api_path: "/api/am/admin/v4".to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("apim-console/{}", env!("CARGO_PKG_VERSION")),
            accept_invalid_certs: false,
            token: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    root: Url,
    token: Option<String>,
}

impl HttpTransport {
    pub fn new(settings: HttpSettings) -> Result<Self> {
        let root = Self::api_root(&settings.base_url, &settings.api_path)?;

        let client = Client::builder()
            .user_agent(settings.user_agent.clone())
            .timeout(settings.timeout)
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            root,
            token: settings.token,
        })
    }

    /// Join base URL and API path into the root every request path hangs off
    fn api_root(base_url: &str, api_path: &str) -> Result<Url> {
        let base = Url::parse(base_url)
            .with_context(|| format!("Invalid backend base URL: {base_url}"))?;
        if base.cannot_be_a_base() {
            return Err(anyhow!("Backend base URL cannot be a base: {base_url}"));
        }
        let mut path = api_path.trim_matches('/').to_string();
        path.push('/');
        base.join(&path)
            .with_context(|| format!("Invalid API path: {api_path}"))
    }

    fn url_for(&self, path: &str) -> Result<Url, ApiError> {
        self.root
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Transport(format!("Invalid request path {path}: {e}")))
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let token = self.token.as_ref().ok_or_else(|| {
            ApiError::NotConfigured(
                "no access token; run `apimctl auth --token <token>` or set APIM_CONSOLE_TOKEN"
                    .to_string(),
            )
        })?;

        let url = self.url_for(&request.path)?;
        let request_id = Uuid::new_v4();
        debug!(%request_id, "{} {}", request.method, url);

        let mut builder = self
            .client
            .request(Self::method(request.method), url.clone())
            .bearer_auth(token)
            .header("Accept", "application/json")
            .header("X-Request-ID", request_id.to_string());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(%request_id, "Request to {} failed: {}", url, e);
            ApiError::Transport(e.to_string())
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(format!("Failed to read response body: {e}")))?;

        // Empty bodies (204, DELETE) and non-JSON error pages still resolve
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        debug!(%request_id, status, "Response received");
        Ok(ApiResponse { status, body })
    }
}
