//! AI configuration form controller.
//!
//! Headless state machine behind the provider settings form: provider
//! selection, API key, base URL, and the fetched model list. The rendering
//! layer binds its widgets to this state and delegates every mutation here.
//!
//! Overlapping discovery calls are resolved last-request-wins: every input
//! change bumps a generation counter, [`begin_discovery`] captures it in a
//! [`DiscoveryTicket`], and [`apply_models`] drops results whose ticket is
//! stale. A slow response for provider A can therefore never overwrite state
//! after the user has already switched to provider B.
//!
//! [`begin_discovery`]: AiConfigForm::begin_discovery
//! [`apply_models`]: AiConfigForm::apply_models

use secrecy::{ExposeSecret, SecretString};

use crate::discovery::{DiscoveryRequest, ModelDiscoveryCapability};
use crate::error::AiError;
use crate::registry::ProviderRegistry;

/// Token tying a discovery result to the form state it was requested under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryTicket(u64);

/// State of the AI provider configuration form.
#[derive(Debug, Clone)]
pub struct AiConfigForm {
    registry: ProviderRegistry,
    provider: String,
    api_key: SecretString,
    base_url: String,
    models: Vec<String>,
    selected_model: Option<String>,
    generation: u64,
}

impl AiConfigForm {
    /// Create an empty form backed by the global provider registry.
    pub fn new() -> Self {
        Self::with_registry(ProviderRegistry::global().clone())
    }

    /// Create an empty form backed by a specific registry.
    pub fn with_registry(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            provider: String::new(),
            api_key: SecretString::from(String::new()),
            base_url: String::new(),
            models: Vec::new(),
            selected_model: None,
            generation: 0,
        }
    }

    /// Select a provider.
    ///
    /// Pre-fills the base URL from the registry for known providers and
    /// clears the fetched models and the selection: model identifiers are not
    /// comparable across providers.
    pub fn set_provider(&mut self, provider: impl Into<String>) {
        self.provider = provider.into();
        if let Some(config) = self.registry.get_provider(&self.provider) {
            self.base_url = config.base_url.clone();
        }
        self.models.clear();
        self.selected_model = None;
        self.generation += 1;
    }

    /// Update the API key. In-flight discovery results become stale.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.api_key = SecretString::from(api_key.into());
        self.generation += 1;
    }

    /// Update the base URL. In-flight discovery results become stale.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
        self.generation += 1;
    }

    /// Currently selected provider identifier.
    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Current base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Models fetched for the current provider, sorted ascending.
    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Currently selected model, if any.
    pub fn selected_model(&self) -> Option<&str> {
        self.selected_model.as_deref()
    }

    /// Whether the model dropdown should be enabled.
    pub fn model_selection_enabled(&self) -> bool {
        !self.models.is_empty()
    }

    /// Select one of the fetched models. Returns false for identifiers that
    /// are not in the current list.
    pub fn select_model(&mut self, model: &str) -> bool {
        if self.models.iter().any(|m| m == model) {
            self.selected_model = Some(model.to_string());
            true
        } else {
            false
        }
    }

    /// Validate the form and build a discovery request from it.
    ///
    /// Missing credential or endpoint is rejected here, before any network
    /// call is made.
    pub fn validate(&self) -> Result<DiscoveryRequest, AiError> {
        if self.api_key.expose_secret().is_empty() {
            return Err(AiError::InvalidInput("API key is required".to_string()));
        }
        if self.base_url.is_empty() {
            return Err(AiError::InvalidInput("Base URL is required".to_string()));
        }
        Ok(DiscoveryRequest::new(
            self.provider.clone(),
            self.base_url.clone(),
            self.api_key.expose_secret().to_string(),
        ))
    }

    /// Capture the current generation for an about-to-start discovery call.
    pub fn begin_discovery(&self) -> DiscoveryTicket {
        DiscoveryTicket(self.generation)
    }

    /// Store a discovery result, unless the form changed since the ticket was
    /// issued.
    ///
    /// Returns true when the result was applied. The first model is
    /// auto-selected; an empty list leaves the selection empty ("no models
    /// available" is a valid success, not an error).
    pub fn apply_models(&mut self, ticket: DiscoveryTicket, models: Vec<String>) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(
                ticket = ticket.0,
                generation = self.generation,
                "discarding stale discovery result"
            );
            return false;
        }
        self.selected_model = models.first().cloned();
        self.models = models;
        true
    }

    /// Validate, run discovery, and apply the result.
    ///
    /// Convenience wiring for callers that serialize their discovery calls;
    /// callers that overlap them should drive the ticket protocol themselves.
    pub async fn discover(
        &mut self,
        client: &dyn ModelDiscoveryCapability,
    ) -> Result<&[String], AiError> {
        let request = self.validate()?;
        let ticket = self.begin_discovery();
        let models = client.discover_models(&request).await?;
        self.apply_models(ticket, models);
        Ok(&self.models)
    }
}

impl Default for AiConfigForm {
    fn default() -> Self {
        Self::new()
    }
}
