//! Provider registry.
//!
//! A configuration-driven table of the AI providers the app knows how to talk
//! to. Each entry carries the provider's display name and default API base
//! URL, used to pre-fill the configuration form when the user picks a
//! provider. The registry is read-only process-wide state; lookups have no
//! side effects.
//!
//! The set of built-in providers is closed: `gemini`, `openai`, `anthropic`,
//! `deepseek`, `openrouter`. Unknown identifiers are rejected here — the
//! discovery client is the only place that deliberately falls back to the
//! OpenAI-compatible protocol for identifiers it does not recognize.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// Provider configuration entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Default base URL for the provider's API
    pub base_url: String,
}

impl ProviderConfig {
    /// Create a new provider entry.
    pub fn new(id: impl Into<String>, name: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_url: base_url.into(),
        }
    }
}

static GLOBAL_REGISTRY: Lazy<ProviderRegistry> = Lazy::new(ProviderRegistry::new);

/// Registry of supported AI providers with built-in configurations.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: HashMap<String, ProviderConfig>,
}

impl ProviderRegistry {
    /// Create a new registry with the built-in providers.
    pub fn new() -> Self {
        let mut registry = Self {
            providers: HashMap::new(),
        };
        registry.register_builtin_providers();
        registry
    }

    /// The process-wide registry instance.
    pub fn global() -> &'static Self {
        &GLOBAL_REGISTRY
    }

    fn register_builtin_providers(&mut self) {
        self.register_provider(ProviderConfig::new(
            "gemini",
            "Gemini",
            "https://generativelanguage.googleapis.com",
        ));
        self.register_provider(ProviderConfig::new(
            "openai",
            "OpenAI",
            "https://api.openai.com/v1",
        ));
        self.register_provider(ProviderConfig::new(
            "anthropic",
            "Anthropic",
            "https://api.anthropic.com",
        ));
        self.register_provider(ProviderConfig::new(
            "deepseek",
            "DeepSeek",
            "https://api.deepseek.com",
        ));
        self.register_provider(ProviderConfig::new(
            "openrouter",
            "OpenRouter",
            "https://openrouter.ai/api/v1",
        ));
    }

    /// Get provider configuration by ID.
    pub fn get_provider(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.get(id)
    }

    /// Get provider configuration by ID, failing on unknown identifiers.
    pub fn require_provider(&self, id: &str) -> Result<&ProviderConfig, AiError> {
        self.get_provider(id)
            .ok_or_else(|| AiError::ConfigurationError(format!("Unknown provider: {id}")))
    }

    /// Register a custom provider.
    pub fn register_provider(&mut self, config: ProviderConfig) {
        self.providers.insert(config.id.clone(), config);
    }

    /// List all registered provider identifiers.
    pub fn list_providers(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.providers.keys().map(|s| s.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
