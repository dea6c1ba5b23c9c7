//! Inline rewrite of the live selection.

use std::sync::Arc;

use inkwell_core::config::RewriteConfig;
use inkwell_core::error::{InkwellError, Result};
use inkwell_core::{Applied, EditorEvent, GatewayError, ModelGateway, Notification, RewriteRequest};

use crate::store::{EditorStore, IndicatorGuard};

pub const REWRITE_FAILED_MESSAGE: &str = "Failed to rewrite content";
pub const REWRITE_DISCARDED_MESSAGE: &str =
    "The text changed while it was being rewritten, so the rewrite was not applied";

/// What to do with the selected text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteInstruction {
    Shorten,
    Formalize,
    FixGrammar,
    Custom(String),
}

impl RewriteInstruction {
    pub fn as_prompt(&self) -> &str {
        match self {
            Self::Shorten => "Make this more concise",
            Self::Formalize => "Make this more professional",
            Self::FixGrammar => "Fix grammar and spelling",
            Self::Custom(text) => text,
        }
    }
}

impl From<&str> for RewriteInstruction {
    fn from(text: &str) -> Self {
        Self::Custom(text.to_string())
    }
}

impl From<String> for RewriteInstruction {
    fn from(text: String) -> Self {
        Self::Custom(text)
    }
}

/// Result of a rewrite that got as far as calling the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The replacement was spliced in at the captured range.
    Applied { text: String },
    /// The captured range no longer fits the document; nothing changed.
    Discarded,
    /// The model call failed; nothing changed.
    Failed(GatewayError),
}

pub struct SelectionRewriter {
    store: EditorStore,
    gateway: Arc<dyn ModelGateway>,
    config: RewriteConfig,
}

impl SelectionRewriter {
    pub fn new(store: EditorStore, gateway: Arc<dyn ModelGateway>, config: RewriteConfig) -> Self {
        Self {
            store,
            gateway,
            config,
        }
    }

    /// Rewrites the live selection according to `instruction`.
    ///
    /// Errors only for input problems (no selection, blank instruction), in
    /// which case nothing changed. Model failures are reported through
    /// [`RewriteOutcome::Failed`] and an error notification.
    pub async fn rewrite(&self, instruction: impl Into<RewriteInstruction>) -> Result<RewriteOutcome> {
        let instruction = instruction.into();
        if instruction.as_prompt().trim().is_empty() {
            return Err(InkwellError::invalid_input("Rewrite instruction is empty"));
        }
        // The toolbar disappears before the request goes out.
        let selection = self.store.take_selection().ok_or(InkwellError::NoSelection)?;

        let _rewriting =
            IndicatorGuard::start(&self.store, EditorEvent::RewriteStarted, EditorEvent::RewriteFinished);
        let request = RewriteRequest {
            selection: selection.text.clone(),
            instruction: instruction.as_prompt().to_string(),
            context: self.store.content(),
        };
        tracing::debug!(
            start = selection.start,
            end = selection.end,
            "[Rewriter] Requesting rewrite"
        );

        let text = match self.gateway.rewrite(request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!("[Rewriter] Rewrite failed: {err}");
                self.store
                    .apply(EditorEvent::Notified(Notification::error(REWRITE_FAILED_MESSAGE)));
                return Ok(RewriteOutcome::Failed(err));
            }
        };

        let splice = EditorEvent::Spliced {
            start: selection.start,
            end: selection.end,
            text: text.clone(),
        };
        let applied = if self.config.guard_stale_selection {
            self.store.apply_if(
                |state| state.document().slice(selection.start, selection.end) == Some(selection.text.as_str()),
                splice,
            )
        } else {
            Some(self.store.apply(splice))
        };

        match applied {
            Some(Applied::Changed) => {
                tracing::info!("[Rewriter] Rewrite applied");
                Ok(RewriteOutcome::Applied { text })
            }
            Some(Applied::Rejected(err)) => {
                // Unguarded splice whose offsets ran past the edited document.
                tracing::warn!("[Rewriter] Could not splice rewrite: {err}");
                self.store
                    .apply(EditorEvent::Notified(Notification::error(REWRITE_FAILED_MESSAGE)));
                Ok(RewriteOutcome::Discarded)
            }
            Some(Applied::Unchanged) | None => {
                tracing::info!("[Rewriter] Selection went stale, rewrite discarded");
                self.store
                    .apply(EditorEvent::Notified(Notification::info(REWRITE_DISCARDED_MESSAGE)));
                Ok(RewriteOutcome::Discarded)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quick_actions_map_to_prompts() {
        assert_eq!(RewriteInstruction::Shorten.as_prompt(), "Make this more concise");
        assert_eq!(RewriteInstruction::Formalize.as_prompt(), "Make this more professional");
        assert_eq!(RewriteInstruction::FixGrammar.as_prompt(), "Fix grammar and spelling");
        assert_eq!(RewriteInstruction::from("Add emoji").as_prompt(), "Add emoji");
    }
}
