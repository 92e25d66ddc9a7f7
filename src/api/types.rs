// ABOUTME: Request/response types and error taxonomy for the admin REST API

use crate::i18n::{Localizer, GENERIC_ERROR};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// One REST call, path relative to the admin API root
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self { method: HttpMethod::Get, path: path.into(), body: None }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self { method: HttpMethod::Delete, path: path.into(), body: None }
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self { method: HttpMethod::Post, path: path.into(), body: Some(body) }
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self { method: HttpMethod::Put, path: path.into(), body: Some(body) }
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self { method: HttpMethod::Patch, path: path.into(), body: Some(body) }
    }
}

/// Any completed HTTP exchange, whatever its status
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The backend's user-facing error text, `{ "description": "..." }`
    pub fn description(&self) -> Option<&str> {
        self.body.get("description").and_then(Value::as_str)
    }

    /// Apply the non-2xx policy: 404 becomes `NotFound`, other failures `Status`
    pub fn into_result(self, path: &str) -> Result<Value, ApiError> {
        if self.is_success() {
            return Ok(self.body);
        }
        if self.status == 404 {
            return Err(ApiError::NotFound { path: path.to_string() });
        }
        Err(ApiError::Status {
            status: self.status,
            description: self.description().map(str::to_string),
        })
    }

    /// Decode a successful body into a typed value
    pub fn decode<T: DeserializeOwned>(self, path: &str) -> Result<T, ApiError> {
        let body = self.into_result(path)?;
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Resource not found: {path}")]
    NotFound { path: String },

    #[error("Backend returned {status}: {}", description.as_deref().unwrap_or("no description"))]
    Status { status: u16, description: Option<String> },

    #[error("Unexpected response body: {0}")]
    Decode(String),

    #[error("Admin API client is not configured: {0}")]
    NotConfigured(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Text to show the user: backend description if any, else the generic message
    pub fn user_message(&self, intl: &dyn Localizer) -> String {
        match self {
            ApiError::Status { description: Some(description), .. } => description.clone(),
            _ => intl.text(&GENERIC_ERROR),
        }
    }
}
