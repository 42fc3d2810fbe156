//! API client that injects the session's bearer token.
//!
//! Every request goes through `ApiClient::request`. A `401` response logs the
//! session out and redirects to the entry route exactly once per response;
//! concurrent requests that each see a `401` each do so independently.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::ApiError;
use crate::auth::AuthStore;
use crate::router::{Redirect, ROOT_PATH};

/// Per-call request description
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a JSON body
    pub fn body<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Add a header; later headers replace earlier ones with the same name
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Build the header set for an outgoing request.
///
/// JSON content type first, then caller headers (which may replace it), then
/// the bearer credential when a non-empty token is held.
pub fn build_headers(token: Option<&str>, extra: &[(String, String)]) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    for (name, value) in extra {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| ApiError::InvalidRequest(format!("Invalid header name: {}", name)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ApiError::InvalidRequest(format!("Invalid value for header {}", name)))?;
        headers.insert(name, value);
    }

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidRequest("Token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, value);
    }

    Ok(headers)
}

/// Session-aware API client.
/// Clone is cheap - reqwest::Client and the auth store are shared handles.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: AuthStore,
    redirect: Arc<dyn Redirect>,
}

impl ApiClient {
    /// Create a new API client. Requests never time out unless `timeout` is set.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        auth: AuthStore,
        redirect: Arc<dyn Redirect>,
    ) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth,
            redirect,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn auth(&self) -> &AuthStore {
        &self.auth
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    /// Send a request and decode the JSON response.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<T, ApiError> {
        let token = self.auth.token();
        let headers = build_headers(token.as_deref(), &options.headers)?;
        let url = self.url(endpoint);
        debug!(method = %options.method, url = %url, authenticated = token.is_some(), "Sending request");

        let mut request = self.client.request(options.method, &url).headers(headers);
        if let Some(ref body) = options.body {
            let bytes = serde_json::to_vec(body)
                .map_err(|e| ApiError::InvalidRequest(format!("Failed to serialize body: {}", e)))?;
            request = request.body(bytes);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            warn!(url = %url, "Unauthorized response, ending session");
            self.auth.logout();
            self.redirect.redirect(ROOT_PATH);
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(url = %url, %status, body = %ApiError::truncate_body(&body), "Request failed");
            return Err(ApiError::from_error_body(status, &body));
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            let body = String::from_utf8_lossy(&bytes);
            ApiError::InvalidResponse(format!(
                "Failed to parse JSON response from {}: {} (body: {})",
                url,
                e,
                ApiError::truncate_body(&body)
            ))
        })
    }

    /// GET an endpoint
    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::GET)).await
    }

    /// POST a JSON body to an endpoint
    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.request(endpoint, RequestOptions::new(Method::POST).body(body)?)
            .await
    }
}
