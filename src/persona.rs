//! Persona generation service.
//!
//! Types and calls for the character-creation flow: the user describes a
//! character, the backend generates a Big Five personality profile for it.

use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::error::AiError;

/// Big Five personality profile, each trait scored by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BigFiveProfile {
    pub openness: f64,
    pub conscientiousness: f64,
    pub extraversion: f64,
    pub agreeableness: f64,
    pub neuroticism: f64,
    /// Free-form trait keywords derived from the profile
    #[serde(default)]
    pub traits: Vec<String>,
}

/// Request payload for persona generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaCreateRequest {
    pub name: String,
    pub gender: String,
    /// Whether this is an original character (as opposed to an existing one)
    pub if_original: bool,
    pub description: String,
}

/// Generated persona returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaResponse {
    pub name: String,
    pub gender: String,
    pub personality: BigFiveProfile,
}

/// Client for the persona endpoints of the Aminder backend.
#[derive(Debug, Clone, Default)]
pub struct PersonaService {
    api: ApiClient,
}

impl PersonaService {
    /// Create a service over the given backend client.
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Generate a personality profile for a character description.
    pub async fn generate_persona(
        &self,
        request: &PersonaCreateRequest,
    ) -> Result<PersonaResponse, AiError> {
        self.api.post("/personas/generate", request).await
    }
}
