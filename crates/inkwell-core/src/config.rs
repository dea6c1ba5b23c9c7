//! Configuration model (`config.toml`).
//!
//! Every field has a default so a partial or missing file is valid.

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_DEBOUNCE_MS: u64 = 2000;
pub const DEFAULT_MIN_PARAGRAPH_CHARS: usize = 50;
pub const DEFAULT_EXPLANATION: &str = "Better flow";
pub const DEFAULT_REWRITE_CONTEXT_CHARS: usize = 500;
pub const DEFAULT_DRAFT_MODEL: &str = "gemini-3-pro-preview";
pub const DEFAULT_FAST_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_THINKING_BUDGET: u32 = 2048;

#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct InkwellConfig {
    #[serde(default)]
    pub review: ReviewConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Debounced proactive review.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ReviewConfig {
    /// Quiet period after the last edit before a review fires.
    pub debounce_ms: u64,
    /// Paragraphs must be strictly longer than this (in chars) to be reviewed.
    pub min_paragraph_chars: usize,
    /// Explanation used when the service returns none.
    pub default_explanation: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            min_paragraph_chars: DEFAULT_MIN_PARAGRAPH_CHARS,
            default_explanation: DEFAULT_EXPLANATION.to_string(),
        }
    }
}

impl ReviewConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Inline selection rewrite.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RewriteConfig {
    /// Drop a rewrite whose captured range no longer holds the selected text.
    pub guard_stale_selection: bool,
    /// How many trailing chars of the document are sent as context.
    pub context_chars: usize,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            guard_stale_selection: true,
            context_chars: DEFAULT_REWRITE_CONTEXT_CHARS,
        }
    }
}

/// Remote model selection and transport.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GatewayConfig {
    /// Model used for chat drafts.
    pub draft_model: String,
    /// Model used for rewrites, reviews and fact checks.
    pub fast_model: String,
    pub thinking_budget: u32,
    /// Unset means requests may wait indefinitely.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            draft_model: DEFAULT_DRAFT_MODEL.to_string(),
            fast_model: DEFAULT_FAST_MODEL.to_string(),
            thinking_budget: DEFAULT_THINKING_BUDGET,
            request_timeout_secs: None,
        }
    }
}

impl GatewayConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
