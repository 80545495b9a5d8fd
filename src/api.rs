//! Generic client for the Aminder backend API.
//!
//! A thin wrapper over `reqwest` that centralizes URL building, JSON
//! encoding, and error mapping for requests against the app's own backend
//! (as opposed to the third-party provider endpoints handled by
//! [`crate::discovery`]).
//!
//! Error body convention: the backend reports failures as a JSON object with
//! an optional `message` field, which is surfaced verbatim; when the body is
//! not JSON (or has no `message`), the HTTP status line is used instead.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::AiError;

/// Default backend address for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// HTTP client for the Aminder backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl ApiClient {
    /// Create a client for the given backend base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Create a client reusing an existing `reqwest` client.
    pub fn with_http_client(base_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http_client,
        }
    }

    /// The backend base URL this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET request with optional query parameters.
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<&[(&str, String)]>,
    ) -> Result<T, AiError> {
        self.request(reqwest::Method::GET, endpoint, query, None)
            .await
    }

    /// POST request with a JSON body.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, AiError> {
        let body = serde_json::to_value(body)?;
        self.request(reqwest::Method::POST, endpoint, None, Some(body))
            .await
    }

    /// PUT request with a JSON body.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, AiError> {
        let body = serde_json::to_value(body)?;
        self.request(reqwest::Method::PUT, endpoint, None, Some(body))
            .await
    }

    /// DELETE request with optional query parameters.
    pub async fn delete<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: Option<&[(&str, String)]>,
    ) -> Result<T, AiError> {
        self.request(reqwest::Method::DELETE, endpoint, query, None)
            .await
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        endpoint: &str,
        query: Option<&[(&str, String)]>,
        body: Option<serde_json::Value>,
    ) -> Result<T, AiError> {
        let url = format!("{}{endpoint}", self.base_url.trim_end_matches('/'));
        tracing::debug!(%method, %url, "backend request");

        let mut req = self
            .http_client
            .request(method, &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(query) = query {
            req = req.query(query);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let details: Option<serde_json::Value> = serde_json::from_str(&error_text).ok();
            let message = details
                .as_ref()
                .and_then(|d| d.get("message"))
                .and_then(|m| m.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| {
                    format!(
                        "HTTP Error {}: {}",
                        status.as_u16(),
                        status.canonical_reason().unwrap_or("Unknown")
                    )
                });
            return Err(AiError::ApiError {
                code: status.as_u16(),
                message,
                details,
            });
        }

        // 204 carries no body; deserialize the null value instead
        if status == reqwest::StatusCode::NO_CONTENT {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }

        let body_text = response.text().await?;
        serde_json::from_str(&body_text)
            .map_err(|e| AiError::ParseError(format!("Invalid response body: {e}")))
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
