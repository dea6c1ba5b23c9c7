//! Configuration service implementation.
//!
//! Loads [`InkwellConfig`] from `~/.config/inkwell/config.toml`.

use std::path::PathBuf;
use std::sync::Arc;

use inkwell_core::InkwellConfig;
use inkwell_core::error::{InkwellError, Result};
use tokio::sync::RwLock;

use crate::paths::InkwellPaths;

/// Configuration service that loads and caches the configuration.
///
/// A missing file yields the defaults; a file that exists but does not parse
/// is an error so a typo never silently resets settings.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration, filled on first access.
    config: Arc<RwLock<Option<InkwellConfig>>>,
}

impl ConfigService {
    /// Creates a service for the default config location.
    pub fn new() -> Result<Self> {
        let path = InkwellPaths::default()
            .config_file()
            .map_err(|e| InkwellError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Gets the configuration, loading from file if not cached.
    pub async fn get_config(&self) -> Result<InkwellConfig> {
        if let Some(cached) = self.config.read().await.as_ref() {
            return Ok(cached.clone());
        }

        let loaded = self.load_config().await?;
        *self.config.write().await = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub async fn invalidate_cache(&self) {
        *self.config.write().await = None;
    }

    async fn load_config(&self) -> Result<InkwellConfig> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(
                    "[Config] No config file at {}, using defaults",
                    self.path.display()
                );
                return Ok(InkwellConfig::default());
            }
            Err(err) => return Err(err.into()),
        };

        let config: InkwellConfig = toml::from_str(&content).map_err(|e| {
            InkwellError::config(format!(
                "Failed to parse configuration file at {}: {}",
                self.path.display(),
                e
            ))
        })?;
        tracing::debug!("[Config] Loaded {}", self.path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(temp_dir.path().join("config.toml"));
        let config = service.get_config().await.unwrap();
        assert_eq!(config, InkwellConfig::default());
    }

    #[tokio::test]
    async fn test_loads_and_caches() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[review]\ndebounce_ms = 750\n").unwrap();

        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().await.unwrap().review.debounce_ms, 750);

        std::fs::write(&path, "[review]\ndebounce_ms = 100\n").unwrap();
        assert_eq!(service.get_config().await.unwrap().review.debounce_ms, 750);

        service.invalidate_cache().await;
        assert_eq!(service.get_config().await.unwrap().review.debounce_ms, 100);
    }

    #[tokio::test]
    async fn test_malformed_file_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[review\ndebounce_ms = ").unwrap();

        let err = ConfigService::with_path(&path).get_config().await.unwrap_err();
        assert!(err.is_config());
    }
}
