//! # Aminder AI — provider configuration and model discovery
//!
//! The AI layer of the Aminder companion app: a registry of supported AI
//! providers, a discovery client that lists the models a provider exposes,
//! the headless controller behind the provider settings form, and the client
//! for the app's own backend (persona generation).
//!
#![deny(unsafe_code)]
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use aminder_ai::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ModelDiscovery::new();
//!     let request = DiscoveryRequest::new(
//!         "openai",
//!         "https://api.openai.com/v1",
//!         "your-api-key",
//!     );
//!     let models = client.discover_models(&request).await?;
//!     for model in models {
//!         println!("{model}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Design notes
//!
//! - Provider wire differences live in a tagged strategy table inside
//!   [`discovery`], keyed by provider identifier; adding a provider with a
//!   custom protocol is a new variant, adding an OpenAI-compatible one needs
//!   nothing at all.
//! - Unexpected response shapes degrade to an empty model list rather than an
//!   error; an empty list means "no models available", which the form treats
//!   as a disabled dropdown.
//! - API keys are held as [`secrecy::SecretString`] and never appear in logs
//!   or error messages.

pub mod api;
pub mod config;
pub mod discovery;
pub mod error;
pub mod persona;
pub mod registry;

pub use api::ApiClient;
pub use config::{AiConfigForm, DiscoveryTicket};
pub use discovery::{DiscoveryRequest, ModelDiscovery, ModelDiscoveryCapability};
pub use error::AiError;
pub use persona::{BigFiveProfile, PersonaCreateRequest, PersonaResponse, PersonaService};
pub use registry::{ProviderConfig, ProviderRegistry};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::api::ApiClient;
    pub use crate::config::{AiConfigForm, DiscoveryTicket};
    pub use crate::discovery::{DiscoveryRequest, ModelDiscovery, ModelDiscoveryCapability};
    pub use crate::error::AiError;
    pub use crate::persona::{
        BigFiveProfile, PersonaCreateRequest, PersonaResponse, PersonaService,
    };
    pub use crate::registry::{ProviderConfig, ProviderRegistry};
}
