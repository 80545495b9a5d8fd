//! Model discovery client.
//!
//! Given a provider identifier, an API base URL, and a credential, the client
//! fetches the list of model identifiers the provider exposes and normalizes
//! it into a deduplicated, lexicographically sorted `Vec<String>`.
//!
//! Providers differ in wire protocol, so each identifier maps to a
//! [`WireStrategy`] variant that knows how to build the request and how to
//! pull model identifiers out of the response:
//!
//! - `gemini` — `GET {base}/v1beta/models?key={key}`, credential in the query
//!   string (no Authorization header), response field `models[*].name` shaped
//!   `"models/{id}"`
//! - `anthropic` — no listing endpoint exists; a fixed fallback list is
//!   returned without any network call
//! - `openai`, `deepseek`, `openrouter`, and anything unrecognized —
//!   OpenAI-compatible `GET {base}/models` with a Bearer token, response
//!   field `data[*].id`
//!
//! Falling back to the OpenAI-compatible protocol for unknown identifiers is
//! deliberate: it lets users point the form at any compatible proxy without
//! the registry having to know about it.
//!
//! Each invocation is independent: no retries, no caching, at most one
//! outstanding request. Overlapping invocations are coordinated by the caller
//! (see [`crate::config::AiConfigForm`]).

use std::collections::BTreeSet;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::AiError;

/// The five Claude models returned when no listing endpoint is available.
const ANTHROPIC_FALLBACK_MODELS: [&str; 5] = [
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240229",
    "claude-2.1",
    "claude-2.0",
];

/// Product name attached to OpenRouter requests via `X-Title`.
const OPENROUTER_APP_TITLE: &str = "Aminder";

/// Default origin attached to OpenRouter requests via `HTTP-Referer`.
const OPENROUTER_DEFAULT_REFERER: &str = "https://aminder.app";

/// Parameters for a single model discovery call.
///
/// Constructed fresh per call; never persisted. The credential is held as a
/// [`SecretString`] and is never logged or included in error messages.
#[derive(Debug, Clone)]
pub struct DiscoveryRequest {
    /// Provider identifier, e.g. `"gemini"` or `"openai"`
    pub provider: String,
    /// API base URL; trailing slashes are stripped before use
    pub base_url: String,
    /// API key for the provider
    pub api_key: SecretString,
}

impl DiscoveryRequest {
    /// Create a new discovery request.
    pub fn new(
        provider: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            base_url: base_url.into(),
            api_key: SecretString::from(api_key.into()),
        }
    }
}

/// Wire protocol used to list models for a given provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WireStrategy {
    /// Gemini REST API, credential in the query string
    Gemini,
    /// No listing endpoint; return the static fallback list
    AnthropicFallback,
    /// `GET /models` with a Bearer token (`data[*].id`)
    OpenAiCompatible,
}

impl WireStrategy {
    fn for_provider(provider: &str) -> Self {
        match provider {
            "gemini" => Self::Gemini,
            "anthropic" => Self::AnthropicFallback,
            // openai, deepseek, openrouter, and unrecognized providers all
            // speak the OpenAI-compatible protocol
            _ => Self::OpenAiCompatible,
        }
    }

    fn request_url(&self, base_url: &str, api_key: &str) -> String {
        match self {
            Self::Gemini => format!(
                "{base_url}/v1beta/models?key={}",
                urlencoding::encode(api_key)
            ),
            Self::OpenAiCompatible => format!("{base_url}/models"),
            Self::AnthropicFallback => unreachable!("fallback strategy issues no request"),
        }
    }

    /// Extract model identifiers from a parsed response body.
    ///
    /// A body that lacks the expected field yields an empty list rather than
    /// an error; the caller treats "no models" and "unexpected shape" alike.
    fn extract_models(&self, body: &serde_json::Value) -> Vec<String> {
        match self {
            Self::Gemini => body
                .get("models")
                .and_then(|models| models.as_array())
                .map(|models| {
                    models
                        .iter()
                        .filter_map(|m| m.get("name").and_then(|n| n.as_str()))
                        .map(|name| name.strip_prefix("models/").unwrap_or(name).to_string())
                        .collect()
                })
                .unwrap_or_default(),
            Self::OpenAiCompatible => body
                .get("data")
                .and_then(|data| data.as_array())
                .map(|data| {
                    data.iter()
                        .filter_map(|m| m.get("id").and_then(|id| id.as_str()))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            Self::AnthropicFallback => unreachable!("fallback strategy parses no response"),
        }
    }
}

/// Capability trait for listing models from a provider.
///
/// The configuration form depends on this trait rather than on
/// [`ModelDiscovery`] directly, so tests can substitute a stub.
#[async_trait]
pub trait ModelDiscoveryCapability: Send + Sync {
    /// Fetch the deduplicated, sorted list of model identifiers.
    async fn discover_models(&self, request: &DiscoveryRequest) -> Result<Vec<String>, AiError>;
}

/// HTTP client for model discovery.
#[derive(Debug, Clone)]
pub struct ModelDiscovery {
    http_client: reqwest::Client,
    referer: String,
}

impl ModelDiscovery {
    /// Create a client with a default HTTP transport.
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
            referer: OPENROUTER_DEFAULT_REFERER.to_string(),
        }
    }

    /// Create a client reusing an existing `reqwest` client.
    pub fn with_http_client(http_client: reqwest::Client) -> Self {
        Self {
            http_client,
            referer: OPENROUTER_DEFAULT_REFERER.to_string(),
        }
    }

    /// Override the origin sent to OpenRouter in the `HTTP-Referer` header.
    pub fn with_referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = referer.into();
        self
    }

    /// List the models available for the given provider configuration.
    ///
    /// Returns a deduplicated, lexicographically sorted list. An empty list
    /// means the provider reported no models (or an unexpected response
    /// shape); it is not an error. Credential and endpoint presence is the
    /// caller's concern (see [`crate::config::AiConfigForm::validate`]).
    pub async fn discover_models(
        &self,
        request: &DiscoveryRequest,
    ) -> Result<Vec<String>, AiError> {
        let base_url = request.base_url.trim_end_matches('/');
        let strategy = WireStrategy::for_provider(&request.provider);

        if strategy == WireStrategy::AnthropicFallback {
            tracing::warn!(
                provider = %request.provider,
                "provider does not expose a model listing endpoint, returning defaults"
            );
            return Ok(ANTHROPIC_FALLBACK_MODELS
                .iter()
                .map(|s| s.to_string())
                .collect());
        }

        let api_key = request.api_key.expose_secret();
        let url = strategy.request_url(base_url, api_key);
        tracing::debug!(provider = %request.provider, endpoint = %base_url, "fetching model list");

        let mut req = self.http_client.get(&url);
        if strategy == WireStrategy::OpenAiCompatible {
            let bearer = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|_| AiError::InvalidInput("API key is not a valid header value".to_string()))?;
            req = req
                .header(reqwest::header::AUTHORIZATION, bearer)
                .header(reqwest::header::CONTENT_TYPE, "application/json");

            // Optional attribution metadata some OpenRouter deployments use.
            if request.provider == "openrouter" {
                req = req
                    .header("HTTP-Referer", self.referer.as_str())
                    .header("X-Title", OPENROUTER_APP_TITLE);
            }
        }

        let response = req.send().await?;
        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError {
                code: status.as_u16(),
                message: format!(
                    "Failed to fetch models: {} {} - {error_text}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
                details: serde_json::from_str(&error_text).ok(),
            });
        }

        let body_text = response.text().await?;
        let body: serde_json::Value = serde_json::from_str(&body_text)
            .map_err(|e| AiError::ParseError(format!("Invalid models response: {e}")))?;

        let models: BTreeSet<String> = strategy.extract_models(&body).into_iter().collect();
        tracing::debug!(provider = %request.provider, count = models.len(), "model list fetched");

        Ok(models.into_iter().collect())
    }

    /// The fixed fallback list used for providers without a listing endpoint.
    pub fn anthropic_fallback_models() -> Vec<String> {
        ANTHROPIC_FALLBACK_MODELS
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}

impl Default for ModelDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ModelDiscoveryCapability for ModelDiscovery {
    async fn discover_models(&self, request: &DiscoveryRequest) -> Result<Vec<String>, AiError> {
        Self::discover_models(self, request).await
    }
}
