//! Secret service implementation.
//!
//! The Gemini API key comes from the first set environment variable among
//! `GEMINI_API_KEY` and `API_KEY`, else from `secret.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use inkwell_core::secret::{GeminiSecret, SecretConfig, SecretService};
use tokio::sync::RwLock;

use crate::paths::InkwellPaths;

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

/// Loads and caches the credential.
#[derive(Clone)]
pub struct SecretServiceImpl {
    secret_path: PathBuf,
    env_vars: Vec<String>,
    secrets: Arc<RwLock<Option<SecretConfig>>>,
}

impl SecretServiceImpl {
    /// Creates a service for the default `secret.json` location.
    pub fn new(base_path: Option<&Path>) -> anyhow::Result<Self> {
        let secret_path = InkwellPaths::new(base_path)
            .secret_file()
            .map_err(|e| anyhow::anyhow!("Failed to get secret path: {}", e))?;
        Ok(Self::with_path(secret_path))
    }

    /// Creates a service reading an explicit `secret.json`.
    pub fn with_path(secret_path: impl Into<PathBuf>) -> Self {
        Self {
            secret_path: secret_path.into(),
            env_vars: API_KEY_ENV_VARS.iter().map(|v| v.to_string()).collect(),
            secrets: Arc::new(RwLock::new(None)),
        }
    }

    /// Replaces the environment variables consulted before the file.
    pub fn with_env_vars<I, S>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_vars = vars.into_iter().map(Into::into).collect();
        self
    }

    fn secret_from_env(&self) -> Option<SecretConfig> {
        self.env_vars.iter().find_map(|var| {
            let api_key = std::env::var(var).ok().filter(|v| !v.trim().is_empty())?;
            tracing::debug!("[Secret] Using API key from ${}", var);
            Some(SecretConfig {
                gemini: Some(GeminiSecret {
                    api_key,
                    model_name: None,
                }),
            })
        })
    }

    async fn secret_from_file(&self) -> Result<SecretConfig, String> {
        let content = tokio::fs::read_to_string(&self.secret_path)
            .await
            .map_err(|e| {
                format!(
                    "Failed to read secret file at {}: {}",
                    self.secret_path.display(),
                    e.kind()
                )
            })?;

        // serde_json errors may quote the input, so only the position is reported
        serde_json::from_str(&content).map_err(|e| {
            format!(
                "Failed to parse secret file at {} (line {}, column {})",
                self.secret_path.display(),
                e.line(),
                e.column()
            )
        })
    }
}

#[async_trait::async_trait]
impl SecretService for SecretServiceImpl {
    async fn load_secrets(&self) -> Result<SecretConfig, String> {
        if let Some(cached) = self.secrets.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = match self.secret_from_env() {
            Some(config) => config,
            None => self.secret_from_file().await?,
        };

        *self.secrets.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    async fn secret_file_exists(&self) -> bool {
        self.secret_from_env().is_some() || tokio::fs::try_exists(&self.secret_path).await.unwrap_or(false)
    }
}
