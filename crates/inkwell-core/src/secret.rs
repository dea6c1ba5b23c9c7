//! Secret management service trait.
//!
//! Defines the interface for loading the API credential of the remote model.

use serde::{Deserialize, Serialize};

/// Root structure of `secret.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretConfig {
    #[serde(default)]
    pub gemini: Option<GeminiSecret>,
}

/// Gemini API credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeminiSecret {
    pub api_key: String,
    /// Overrides both configured models when set.
    #[serde(default)]
    pub model_name: Option<String>,
}

/// Service for loading secret configuration.
///
/// Implementations must never log or embed the key in error messages.
#[async_trait::async_trait]
pub trait SecretService: Send + Sync {
    /// Loads the secret configuration.
    ///
    /// The error string must not contain secrets.
    async fn load_secrets(&self) -> Result<SecretConfig, String>;

    /// Checks if a credential source is available.
    async fn secret_file_exists(&self) -> bool;
}
