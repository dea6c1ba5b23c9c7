use std::sync::Arc;

use anyhow::{Context, Result};
use inkwell_core::{InkwellConfig, ModelGateway};
use inkwell_infrastructure::ConfigService;
use inkwell_interaction::GeminiGateway;

use crate::writer_session::WriterSession;

/// Wires a [`WriterSession`] from `~/.config/inkwell/` and the environment.
pub async fn bootstrap() -> Result<WriterSession> {
    let config_service = ConfigService::new().context("Failed to locate config file")?;
    let config = config_service
        .get_config()
        .await
        .with_context(|| format!("Failed to load {}", config_service.path().display()))?;
    tracing::info!(
        "[Bootstrap] Loaded config from {}",
        config_service.path().display()
    );
    bootstrap_with_config(config).await
}

/// Same as [`bootstrap`] with an already loaded configuration.
pub async fn bootstrap_with_config(config: InkwellConfig) -> Result<WriterSession> {
    let gateway = GeminiGateway::try_from_env(config.gateway.clone())
        .await
        .context("Failed to initialize Gemini gateway")?
        .with_rewrite_context_chars(config.rewrite.context_chars);
    tracing::info!(
        draft_model = %gateway.config().draft_model,
        fast_model = %gateway.config().fast_model,
        "[Bootstrap] Gemini gateway ready"
    );

    let gateway: Arc<dyn ModelGateway> = Arc::new(gateway);
    Ok(WriterSession::new(gateway, &config))
}
