// ABOUTME: Admin REST API client: one method per backend operation, per resource family
// Methods return the raw {status, body}; `fetch_*` helpers apply the non-2xx policy

use crate::api::transport::{HttpSettings, HttpTransport, Transport};
use crate::api::types::{ApiError, ApiRequest, ApiResponse};
use crate::models::{AppMappings, Collection, RoleAliasList, Scope, ScopeList};
use anyhow::Result;
use serde_json::{json, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

const ROLE_ALIASES_PATH: &str = "/system-scopes/role-aliases";
const SYSTEM_SCOPES_PATH: &str = "/system-scopes";

/// Entity families with the standard collection/item operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceFamily {
    ApplicationPolicies,
    SubscriptionPolicies,
    AdvancedPolicies,
    DenyPolicies,
    ApiCategories,
    KeyManagers,
}

impl ResourceFamily {
    pub fn all() -> Vec<ResourceFamily> {
        vec![
            ResourceFamily::ApplicationPolicies,
            ResourceFamily::SubscriptionPolicies,
            ResourceFamily::AdvancedPolicies,
            ResourceFamily::DenyPolicies,
            ResourceFamily::ApiCategories,
            ResourceFamily::KeyManagers,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceFamily::ApplicationPolicies => "application-policies",
            ResourceFamily::SubscriptionPolicies => "subscription-policies",
            ResourceFamily::AdvancedPolicies => "advanced-policies",
            ResourceFamily::DenyPolicies => "deny-policies",
            ResourceFamily::ApiCategories => "api-categories",
            ResourceFamily::KeyManagers => "key-managers",
        }
    }

    pub fn collection_path(&self) -> &'static str {
        match self {
            ResourceFamily::ApplicationPolicies => "/throttling/policies/application",
            ResourceFamily::SubscriptionPolicies => "/throttling/policies/subscription",
            ResourceFamily::AdvancedPolicies => "/throttling/policies/advanced",
            ResourceFamily::DenyPolicies => "/throttling/deny-policies",
            ResourceFamily::ApiCategories => "/api-categories",
            ResourceFamily::KeyManagers => "/key-managers",
        }
    }

    pub fn item_path(&self, id: &str) -> String {
        match self {
            // Individual deny policies live under a singular path
            ResourceFamily::DenyPolicies => format!("/throttling/deny-policy/{id}"),
            _ => format!("{}/{id}", self.collection_path()),
        }
    }

    /// Field carrying the backend-assigned identifier
    pub fn id_field(&self) -> &'static str {
        match self {
            ResourceFamily::ApplicationPolicies
            | ResourceFamily::SubscriptionPolicies
            | ResourceFamily::AdvancedPolicies => "policyId",
            ResourceFamily::DenyPolicies => "conditionId",
            ResourceFamily::ApiCategories | ResourceFamily::KeyManagers => "id",
        }
    }
}

impl fmt::Display for ResourceFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceFamily::all()
            .into_iter()
            .find(|family| family.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = ResourceFamily::all().iter().map(|f| f.as_str()).collect();
                format!("unknown resource family '{s}' (expected one of: {})", known.join(", "))
            })
    }
}

/// The six named operations for one resource family
#[derive(Clone)]
pub struct ResourceClient {
    transport: Arc<dyn Transport>,
    family: ResourceFamily,
}

impl ResourceClient {
    pub fn family(&self) -> ResourceFamily {
        self.family
    }

    pub async fn list(&self) -> Result<ApiResponse, ApiError> {
        self.transport.send(ApiRequest::get(self.family.collection_path())).await
    }

    pub async fn get(&self, id: &str) -> Result<ApiResponse, ApiError> {
        self.transport.send(ApiRequest::get(self.family.item_path(id))).await
    }

    /// Never retried: a repeated create could duplicate the entity
    pub async fn create(&self, body: Value) -> Result<ApiResponse, ApiError> {
        self.transport
            .send(ApiRequest::post(self.family.collection_path(), body))
            .await
    }

    pub async fn update(&self, id: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.transport.send(ApiRequest::put(self.family.item_path(id), body)).await
    }

    pub async fn delete(&self, id: &str) -> Result<ApiResponse, ApiError> {
        self.transport.send(ApiRequest::delete(self.family.item_path(id))).await
    }

    pub async fn patch_status(&self, id: &str, body: Value) -> Result<ApiResponse, ApiError> {
        self.transport.send(ApiRequest::patch(self.family.item_path(id), body)).await
    }

    /// List and unwrap the `{count, list}` envelope
    pub async fn fetch_list(&self) -> Result<Vec<Value>, ApiError> {
        let path = self.family.collection_path();
        let body = self.list().await?.into_result(path)?;
        let rows = match body {
            Value::Array(rows) => rows,
            other => serde_json::from_value::<Collection<Value>>(other)
                .map_err(|e| ApiError::Decode(e.to_string()))?
                .list,
        };
        debug!("Fetched {} rows from {}", rows.len(), path);
        Ok(rows)
    }

    pub async fn fetch(&self, id: &str) -> Result<Value, ApiError> {
        self.get(id).await?.into_result(&self.family.item_path(id))
    }
}

/// Entry point for every admin REST call
#[derive(Clone)]
pub struct AdminApi {
    transport: Arc<dyn Transport>,
}

impl AdminApi {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Build a client over HTTP
    pub fn connect(settings: HttpSettings) -> Result<Self> {
        info!("Connecting admin API client to {}", settings.base_url);
        let transport = HttpTransport::new(settings)?;
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn resource(&self, family: ResourceFamily) -> ResourceClient {
        ResourceClient {
            transport: Arc::clone(&self.transport),
            family,
        }
    }

    pub async fn role_aliases(&self) -> Result<RoleAliasList, ApiError> {
        self.transport
            .send(ApiRequest::get(ROLE_ALIASES_PATH))
            .await?
            .decode(ROLE_ALIASES_PATH)
    }

    /// Replace the whole role-alias list; the response body is the new authoritative list
    pub async fn update_role_aliases(&self, aliases: &RoleAliasList) -> Result<RoleAliasList, ApiError> {
        let body = serde_json::to_value(aliases).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.transport
            .send(ApiRequest::put(ROLE_ALIASES_PATH, body))
            .await?
            .decode(ROLE_ALIASES_PATH)
    }

    pub async fn system_scopes(&self) -> Result<ScopeList, ApiError> {
        self.transport
            .send(ApiRequest::get(SYSTEM_SCOPES_PATH))
            .await?
            .decode(SYSTEM_SCOPES_PATH)
    }

    pub async fn update_system_scopes(&self, scopes: &ScopeList) -> Result<ScopeList, ApiError> {
        let body = json!({ "count": scopes.list.len(), "list": scopes.list });
        self.transport
            .send(ApiRequest::put(SYSTEM_SCOPES_PATH, body))
            .await?
            .decode(SYSTEM_SCOPES_PATH)
    }
}

/// Application a scope belongs to: its name prefix, else "default"
pub fn scope_app(name: &str) -> &str {
    name.split_once(':').map_or("default", |(prefix, _)| prefix)
}

/// Group scopes by their prefix (`apim:api_create` belongs to `apim`)
pub fn group_scopes(scopes: &ScopeList) -> AppMappings {
    let mut mappings = AppMappings::new();
    for scope in &scopes.list {
        mappings
            .entry(scope_app(&scope.name).to_string())
            .or_default()
            .push(scope.clone());
    }
    mappings
}

/// Inverse of `group_scopes`
pub fn flatten_scopes(mappings: &AppMappings) -> ScopeList {
    let list: Vec<Scope> = mappings.values().flatten().cloned().collect();
    ScopeList { count: list.len(), list }
}
