// ABOUTME: Admin REST API access: request types, HTTP transport and the resource client

pub mod client;
pub mod transport;
pub mod types;

pub use client::{flatten_scopes, group_scopes, scope_app, AdminApi, ResourceClient, ResourceFamily};
pub use transport::{HttpSettings, HttpTransport, Transport};
pub use types::{ApiError, ApiRequest, ApiResponse, HttpMethod};
